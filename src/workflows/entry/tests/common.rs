use chrono::NaiveDate;

use crate::workflows::entry::domain::{
    Applicant, Country, CountryTable, LocationRecord, VisaRecord,
};
use crate::workflows::entry::evaluation::{DecisionEngine, EngineConfig};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 12, 16).expect("valid date")
}

fn country(code: &str, name: &str, visitor_visa: bool, advisory: &str) -> Country {
    Country {
        code: code.to_string(),
        name: name.to_string(),
        visitor_visa_required: visitor_visa,
        transit_visa_required: false,
        medical_advisory: advisory.to_string(),
    }
}

/// `ALB` and `LUG` demand visitor visas; `CFR` and `LUG` are under advisory.
pub(super) fn countries() -> CountryTable {
    [
        country("KAN", "Kanadia", false, ""),
        country("ALB", "Duchy of Alberta", true, ""),
        country("BRD", "Bordovia", false, ""),
        country("CFR", "Confederacy of Frejya", false, "SARS"),
        country("LUG", "Democratic Republic of Lungary", true, "MUMPS"),
    ]
    .into_iter()
    .collect()
}

pub(super) fn engine() -> DecisionEngine {
    DecisionEngine::default()
}

pub(super) fn five_group_engine() -> DecisionEngine {
    DecisionEngine::new(EngineConfig::with_visa_code_format(
        crate::workflows::entry::VisaCodeFormat::FiveGroup,
    ))
}

pub(super) fn location(country: &str) -> LocationRecord {
    LocationRecord::new("Somewhere", "Some Region", country)
}

pub(super) fn visa(code: &str, date: &str) -> VisaRecord {
    VisaRecord::new(code, date)
}

pub(super) fn citizen(from: &str) -> Applicant {
    Applicant {
        passport: Some("6P294-42HR2-95PSF-93NFF-2TEWF".to_string()),
        first_name: Some("Jack".to_string()),
        last_name: Some("Doe".to_string()),
        birth_date: Some("1938-12-21".to_string()),
        home: Some(location("KAN")),
        entry_reason: Some("returning".to_string()),
        origin: Some(location(from)),
        via: None,
        visa: None,
    }
}

pub(super) fn visitor(home: &str, from: &str, visa: Option<VisaRecord>) -> Applicant {
    Applicant {
        home: Some(location(home)),
        entry_reason: Some("visiting".to_string()),
        visa,
        ..citizen(from)
    }
}
