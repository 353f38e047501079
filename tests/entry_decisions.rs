use chrono::NaiveDate;
use kanadia_border::workflows::entry::{
    decide, Applicant, CountryTable, DecisionEngine, Disposition, EngineConfig, EntryDataLoader,
    EntryLoadError, LocationRecord, VisaCodeFormat, VisaRecord,
};
use std::path::PathBuf;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 12, 16).expect("valid date")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_countries() -> CountryTable {
    EntryDataLoader::countries_from_reader(include_str!("fixtures/countries.json").as_bytes())
        .expect("country fixture parses")
}

#[test]
fn fixture_batch_yields_expected_dispositions_in_order() {
    let applicants =
        EntryDataLoader::applicants_from_path(fixture("entries.json")).expect("entries parse");
    let countries =
        EntryDataLoader::countries_from_path(fixture("countries.json")).expect("countries parse");

    let dispositions = decide(&applicants, &countries, today()).expect("batch decides");

    use Disposition::*;
    assert_eq!(
        dispositions,
        vec![
            Accept, Quarantine, Accept, Reject, Quarantine, Quarantine, Reject, Reject, Reject
        ]
    );
}

#[test]
fn repeated_runs_are_identical() {
    let applicants = EntryDataLoader::applicants_from_reader(
        include_str!("fixtures/entries.json").as_bytes(),
    )
    .expect("entries parse");
    let countries = fixture_countries();
    let engine = DecisionEngine::default();

    let first = engine
        .evaluate_batch(&applicants, &countries, today())
        .expect("first run");
    let second = engine
        .evaluate_batch(&applicants, &countries, today())
        .expect("second run");

    assert_eq!(first, second);
}

#[test]
fn three_year_old_visa_from_home_nation_is_rejected() {
    let countries = fixture_countries();
    let applicant = Applicant {
        passport: Some("6P294-42HR2-95PSF-93NFF-2TEWF".to_string()),
        first_name: Some("Ivan".to_string()),
        last_name: Some("Petrov".to_string()),
        birth_date: Some("1980-01-01".to_string()),
        home: Some(LocationRecord::new("Lugberg", "North", "LUG")),
        entry_reason: Some("visiting".to_string()),
        origin: Some(LocationRecord::new("Bala", "ON", "KAN")),
        via: None,
        visa: Some(VisaRecord::new("CFR6X-XSMVA", "2012-12-16")),
    };

    let dispositions = decide(&[applicant], &countries, today()).expect("decides");
    assert_eq!(dispositions, vec![Disposition::Reject]);
}

#[test]
fn visa_validity_tracks_evaluation_date() {
    let applicants = EntryDataLoader::applicants_from_reader(
        include_str!("fixtures/entries.json").as_bytes(),
    )
    .expect("entries parse");
    let countries = fixture_countries();
    let later = NaiveDate::from_ymd_opt(2017, 2, 25).expect("valid date");

    let dispositions = decide(&applicants[2..3], &countries, later).expect("decides");
    assert_eq!(dispositions, vec![Disposition::Reject]);

    let boundary = NaiveDate::from_ymd_opt(2017, 2, 24).expect("valid date");
    let dispositions = decide(&applicants[2..3], &countries, boundary).expect("decides");
    assert_eq!(dispositions, vec![Disposition::Accept]);
}

#[test]
fn five_group_configuration_changes_visa_outcome() {
    let applicants = EntryDataLoader::applicants_from_reader(
        include_str!("fixtures/entries.json").as_bytes(),
    )
    .expect("entries parse");
    let engine = DecisionEngine::new(EngineConfig::with_visa_code_format(
        VisaCodeFormat::FiveGroup,
    ));

    let dispositions = engine
        .decide(&applicants[2..3], &fixture_countries(), today())
        .expect("decides");
    assert_eq!(dispositions, vec![Disposition::Reject]);
}

#[test]
fn malformed_batch_fails_before_any_decision() {
    let batch = r#"[{"passport": "6P294-42HR2-95PSF-93NFF-2TEWF"}, {"home": "KAN"}]"#;
    let err = EntryDataLoader::applicants_from_reader(batch.as_bytes())
        .expect_err("string home is not a location");
    assert!(matches!(err, EntryLoadError::Applicants(_)));
}
