//! Border entry intake and decision rules for arrivals into Kanadia.
//!
//! Each applicant is classified independently against a read-only country
//! table: incomplete records and unknown locations are rejected, citizens and
//! visitors with no or valid visa requirements are accepted, and anyone who
//! travelled from or via a country under medical advisory is quarantined.

pub mod domain;
pub mod evaluation;
pub mod loader;
pub mod router;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Applicant, Country, CountryTable, Disposition, LocationRecord, VisaRecord, HOME_COUNTRY_CODE,
};
pub use evaluation::{
    decide, has_valid_visa, required_fields_present, requires_visitor_visa,
    travelled_via_advisory_country, unknown_location_exists, AdvisoryExposure, DecisionEngine,
    DecisionError, EngineConfig, EntryDecision, EntryRationale,
};
pub use loader::{parse_date, EntryDataLoader, EntryLoadError};
pub use router::{entry_router, EntryDecisionState};
pub use validation::{
    date_format_valid, location_valid, passport_format_valid, visa_code_format_valid,
    visa_shape_valid, VisaCodeFormat,
};
