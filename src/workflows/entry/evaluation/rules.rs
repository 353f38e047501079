use chrono::{Datelike, NaiveDate};

use super::super::domain::{Applicant, CountryTable, HOME_COUNTRY_CODE};
use super::super::validation::{
    date_fields, location_valid, month_day_valid, visa_shape_valid, VisaCodeFormat,
};
use super::DecisionError;

/// Visas issued this many years before the evaluation date are still honoured.
pub(crate) const VISA_VALIDITY_YEARS: i32 = 2;

/// All required keys are present and every present location and visa is well
/// formed.
///
/// Passport, birth date and visa string formats are not checked here.
pub fn required_fields_present(applicant: &Applicant) -> bool {
    applicant.missing_required_fields().is_empty()
        && malformed_locations(applicant).is_empty()
        && !malformed_visa(applicant)
}

/// A visa is attached but carries unexpected keys or non-string values.
pub(crate) fn malformed_visa(applicant: &Applicant) -> bool {
    applicant
        .visa
        .as_ref()
        .is_some_and(|visa| !visa_shape_valid(visa))
}

/// Location keys whose records do not have exactly `city`, `region`, `country`.
pub(crate) fn malformed_locations(applicant: &Applicant) -> Vec<&'static str> {
    applicant
        .locations()
        .filter(|(_, location)| !location_valid(location))
        .map(|(label, _)| label)
        .collect()
}

/// A present location names a country that is neither home nor in the table.
pub fn unknown_location_exists(applicant: &Applicant, countries: &CountryTable) -> bool {
    !unknown_location_codes(applicant, countries).is_empty()
}

pub(crate) fn unknown_location_codes(
    applicant: &Applicant,
    countries: &CountryTable,
) -> Vec<String> {
    applicant
        .locations()
        .filter_map(|(_, location)| match location.country() {
            Some(code) if code == HOME_COUNTRY_CODE || countries.contains(code) => None,
            Some(code) => Some(code.to_string()),
            None => Some(String::new()),
        })
        .collect()
}

/// The traveller came from, or passed through, a country under medical advisory.
pub fn travelled_via_advisory_country(applicant: &Applicant, countries: &CountryTable) -> bool {
    !advisory_exposures(applicant, countries).is_empty()
}

/// `(country code, advisory)` for each `from`/`via` location under advisory.
pub(crate) fn advisory_exposures(
    applicant: &Applicant,
    countries: &CountryTable,
) -> Vec<(String, String)> {
    applicant
        .travel_locations()
        .filter_map(|(_, location)| location.country())
        .filter_map(|code| {
            countries
                .get(code)
                .filter(|country| country.has_medical_advisory())
                .map(|country| (code.to_string(), country.medical_advisory.clone()))
        })
        .collect()
}

/// Whether the applicant's home country demands a visitor visa.
///
/// Only called for non-citizens whose home country already passed the
/// unknown-location gate, so a lookup miss is an invariant violation.
pub fn requires_visitor_visa(
    applicant: &Applicant,
    countries: &CountryTable,
) -> Result<bool, DecisionError> {
    let code = applicant
        .home_country()
        .ok_or_else(|| DecisionError::invariant("home country missing after location gate"))?;

    countries
        .get(code)
        .map(|country| country.visitor_visa_required)
        .ok_or_else(|| {
            DecisionError::invariant(format!(
                "home country '{code}' absent from country table after location gate"
            ))
        })
}

/// The applicant holds a visa with a well-formed code issued within the last
/// two years of `today`, inclusive.
///
/// Dates compare field-wise against the same month and day two years back,
/// so no calendar-duration arithmetic is involved.
pub fn has_valid_visa(applicant: &Applicant, today: NaiveDate, format: VisaCodeFormat) -> bool {
    let Some(visa) = applicant.visa.as_ref() else {
        return false;
    };
    let (Some(code), Some(date)) = (visa.code(), visa.date()) else {
        return false;
    };

    format.matches(code) && issued_within_validity(date, today)
}

fn issued_within_validity(date: &str, today: NaiveDate) -> bool {
    let Some(issued @ (_, month, day)) = date_fields(date) else {
        return false;
    };
    if !month_day_valid(month, day) {
        return false;
    }

    let cutoff_year = today.year() - VISA_VALIDITY_YEARS;
    if cutoff_year < 0 {
        return true;
    }
    let cutoff = (cutoff_year as u32, today.month(), today.day());

    issued >= cutoff
}
