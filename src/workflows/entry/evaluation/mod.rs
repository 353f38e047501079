mod config;
mod policy;
mod rules;

pub use config::EngineConfig;
pub use policy::{AdvisoryExposure, EntryDecision, EntryRationale};
pub use rules::{
    has_valid_visa, required_fields_present, requires_visitor_visa,
    travelled_via_advisory_country, unknown_location_exists,
};

use super::domain::{Applicant, CountryTable, Disposition};
use chrono::NaiveDate;
use policy::decide_outcome;
use tracing::{debug, info};

/// Raised only when the rule ordering itself is broken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    #[error("decision invariant violated: {detail}")]
    InvariantViolation { detail: String },
    #[error("applicant #{index}: {source}")]
    Applicant {
        index: usize,
        #[source]
        source: Box<DecisionError>,
    },
}

impl DecisionError {
    pub(crate) fn invariant(detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            detail: detail.into(),
        }
    }

    fn at(self, index: usize) -> Self {
        Self::Applicant {
            index,
            source: Box::new(self),
        }
    }
}

/// Stateless evaluator applying the entry rules against a country table.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: EngineConfig,
}

impl DecisionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        applicant: &Applicant,
        countries: &CountryTable,
        today: NaiveDate,
    ) -> Result<EntryDecision, DecisionError> {
        decide_outcome(applicant, countries, &self.config, today)
    }

    /// Classifies every applicant, preserving input order.
    pub fn evaluate_batch(
        &self,
        applicants: &[Applicant],
        countries: &CountryTable,
        today: NaiveDate,
    ) -> Result<Vec<EntryDecision>, DecisionError> {
        let decisions = applicants
            .iter()
            .enumerate()
            .map(|(index, applicant)| {
                self.evaluate(applicant, countries, today)
                    .map_err(|err| err.at(index))
                    .inspect(|decision| {
                        debug!(
                            index,
                            disposition = %decision.disposition,
                            rationale = %decision.summary(),
                            "applicant classified"
                        )
                    })
            })
            .collect::<Result<Vec<_>, DecisionError>>()?;

        let count = |wanted: Disposition| {
            decisions
                .iter()
                .filter(|decision| decision.disposition == wanted)
                .count()
        };
        info!(
            applicants = decisions.len(),
            accepted = count(Disposition::Accept),
            rejected = count(Disposition::Reject),
            quarantined = count(Disposition::Quarantine),
            %today,
            "entry batch decided"
        );

        Ok(decisions)
    }

    pub fn decide(
        &self,
        applicants: &[Applicant],
        countries: &CountryTable,
        today: NaiveDate,
    ) -> Result<Vec<Disposition>, DecisionError> {
        Ok(self
            .evaluate_batch(applicants, countries, today)?
            .into_iter()
            .map(|decision| decision.disposition)
            .collect())
    }
}

/// Dispositions for a batch under the default engine configuration.
pub fn decide(
    applicants: &[Applicant],
    countries: &CountryTable,
    today: NaiveDate,
) -> Result<Vec<Disposition>, DecisionError> {
    DecisionEngine::default().decide(applicants, countries, today)
}
