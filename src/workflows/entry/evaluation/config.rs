use serde::{Deserialize, Serialize};

use super::super::validation::VisaCodeFormat;

/// Knobs the fixed rule set exposes to its caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Code layout a visa must match to satisfy the visitor visa rule.
    #[serde(default)]
    pub visa_code_format: VisaCodeFormat,
}

impl EngineConfig {
    pub fn with_visa_code_format(visa_code_format: VisaCodeFormat) -> Self {
        Self { visa_code_format }
    }
}
