use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{Applicant, CountryTable, Disposition, HOME_COUNTRY_CODE};
use super::config::EngineConfig;
use super::rules::{
    advisory_exposures, has_valid_visa, malformed_locations, malformed_visa, requires_visitor_visa,
    unknown_location_codes, VISA_VALIDITY_YEARS,
};
use super::DecisionError;

/// Why an applicant ended up with their disposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum EntryRationale {
    MissingRequiredFields {
        missing: Vec<String>,
        malformed_locations: Vec<String>,
        malformed_visa: bool,
    },
    UnknownLocation {
        codes: Vec<String>,
    },
    ReturningCitizen,
    VisaNotRequired,
    ValidVisa,
    InvalidVisa,
    MedicalAdvisory {
        exposures: Vec<AdvisoryExposure>,
        base: Disposition,
    },
}

/// A `from`/`via` country under advisory that the applicant travelled through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryExposure {
    pub country: String,
    pub advisory: String,
}

impl EntryRationale {
    pub fn summary(&self) -> String {
        match self {
            EntryRationale::MissingRequiredFields {
                missing,
                malformed_locations,
                malformed_visa,
            } => {
                let mut parts = Vec::new();
                if !missing.is_empty() {
                    parts.push(format!("missing {}", missing.join(", ")));
                }
                if !malformed_locations.is_empty() {
                    parts.push(format!(
                        "malformed location {}",
                        malformed_locations.join(", ")
                    ));
                }
                if *malformed_visa {
                    parts.push("malformed visa".to_string());
                }
                format!("rejected for incomplete record: {}", parts.join("; "))
            }
            EntryRationale::UnknownLocation { codes } => {
                format!("rejected for unknown location(s): {}", codes.join(", "))
            }
            EntryRationale::ReturningCitizen => "accepted as returning citizen".to_string(),
            EntryRationale::VisaNotRequired => {
                "accepted; home country requires no visitor visa".to_string()
            }
            EntryRationale::ValidVisa => "accepted with valid visitor visa".to_string(),
            EntryRationale::InvalidVisa => format!(
                "rejected; visitor visa missing, malformed, or older than {VISA_VALIDITY_YEARS} years"
            ),
            EntryRationale::MedicalAdvisory { exposures, base } => {
                let countries = exposures
                    .iter()
                    .map(|exposure| format!("{} ({})", exposure.country, exposure.advisory))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("quarantined after travel via {countries}; base outcome {base}")
            }
        }
    }
}

/// Disposition plus the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDecision {
    pub disposition: Disposition,
    pub rationale: EntryRationale,
}

impl EntryDecision {
    fn new(disposition: Disposition, rationale: EntryRationale) -> Self {
        Self {
            disposition,
            rationale,
        }
    }

    pub fn summary(&self) -> String {
        self.rationale.summary()
    }
}

pub(crate) fn decide_outcome(
    applicant: &Applicant,
    countries: &CountryTable,
    config: &EngineConfig,
    today: NaiveDate,
) -> Result<EntryDecision, DecisionError> {
    let missing = applicant.missing_required_fields();
    let malformed = malformed_locations(applicant);
    let visa_malformed = malformed_visa(applicant);
    if !missing.is_empty() || !malformed.is_empty() || visa_malformed {
        return Ok(EntryDecision::new(
            Disposition::Reject,
            EntryRationale::MissingRequiredFields {
                missing: missing.into_iter().map(str::to_string).collect(),
                malformed_locations: malformed.into_iter().map(str::to_string).collect(),
                malformed_visa: visa_malformed,
            },
        ));
    }

    let unknown = unknown_location_codes(applicant, countries);
    if !unknown.is_empty() {
        return Ok(EntryDecision::new(
            Disposition::Reject,
            EntryRationale::UnknownLocation { codes: unknown },
        ));
    }

    let base = base_outcome(applicant, countries, config, today)?;

    let exposures = advisory_exposures(applicant, countries);
    if !exposures.is_empty() {
        return Ok(EntryDecision::new(
            Disposition::Quarantine,
            EntryRationale::MedicalAdvisory {
                exposures: exposures
                    .into_iter()
                    .map(|(country, advisory)| AdvisoryExposure { country, advisory })
                    .collect(),
                base: base.disposition,
            },
        ));
    }

    Ok(base)
}

fn base_outcome(
    applicant: &Applicant,
    countries: &CountryTable,
    config: &EngineConfig,
    today: NaiveDate,
) -> Result<EntryDecision, DecisionError> {
    if applicant.home_country() == Some(HOME_COUNTRY_CODE) {
        return Ok(EntryDecision::new(
            Disposition::Accept,
            EntryRationale::ReturningCitizen,
        ));
    }

    if !requires_visitor_visa(applicant, countries)? {
        return Ok(EntryDecision::new(
            Disposition::Accept,
            EntryRationale::VisaNotRequired,
        ));
    }

    if has_valid_visa(applicant, today, config.visa_code_format) {
        Ok(EntryDecision::new(Disposition::Accept, EntryRationale::ValidVisa))
    } else {
        Ok(EntryDecision::new(
            Disposition::Reject,
            EntryRationale::InvalidVisa,
        ))
    }
}
