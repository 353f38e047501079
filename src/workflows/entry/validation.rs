//! Field and format predicates used by the entry rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::{LocationRecord, VisaRecord, LOCATION_KEYS, VISA_KEYS};

static PASSPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Za-z]{5}-){4}[0-9A-Za-z]{5}$").expect("passport pattern compiles")
});

static VISA_CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Za-z]{5}-[0-9A-Za-z]{5}$").expect("visa code pattern compiles")
});

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}(-[0-9]{2}){2}$").expect("date pattern compiles"));

const EARLIEST_YEAR: u32 = 1900;
const LATEST_YEAR: u32 = 2016;

/// Five dash-separated groups of five alphanumerics, case-insensitive.
pub fn passport_format_valid(code: &str) -> bool {
    PASSPORT_PATTERN.is_match(code)
}

/// Two dash-separated groups of five alphanumerics, case-insensitive.
pub fn visa_code_format_valid(code: &str) -> bool {
    VISA_CODE_PATTERN.is_match(code)
}

/// `YYYY-MM-DD` within the accepted year range and month lengths.
///
/// February always allows 29 days; leap years are not distinguished.
pub fn date_format_valid(date: &str) -> bool {
    let Some((year, month, day)) = date_fields(date) else {
        return false;
    };

    (EARLIEST_YEAR..=LATEST_YEAR).contains(&year) && month_day_valid(month, day)
}

/// Month in `1..=12` and day within that month's length, any year.
///
/// February always allows 29 days; leap years are not distinguished.
pub(crate) fn month_day_valid(month: u32, day: u32) -> bool {
    let max_day = match month {
        4 | 6 | 9 | 11 => 30,
        2 => 29,
        1..=12 => 31,
        _ => return false,
    };

    (1..=max_day).contains(&day)
}

/// Splits a `YYYY-MM-DD` string into numeric fields without calendar checks.
pub(crate) fn date_fields(date: &str) -> Option<(u32, u32, u32)> {
    if !DATE_PATTERN.is_match(date) {
        return None;
    }

    let year = date[0..4].parse().ok()?;
    let month = date[5..7].parse().ok()?;
    let day = date[8..10].parse().ok()?;
    Some((year, month, day))
}

/// True when the location carries exactly `city`, `region` and `country`.
pub fn location_valid(location: &LocationRecord) -> bool {
    location.len() == LOCATION_KEYS.len()
        && LOCATION_KEYS
            .iter()
            .all(|key| location.keys().any(|present| present == *key))
}

/// True when the visa carries no keys besides `code` and `date`, and those
/// present are strings. Missing keys are left to the visa validity rule.
pub fn visa_shape_valid(visa: &VisaRecord) -> bool {
    visa.fields()
        .all(|(key, value)| VISA_KEYS.contains(&key) && value.is_string())
}

/// Which code pattern a visa must satisfy to count as valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisaCodeFormat {
    /// `XXXXX-XXXXX`
    #[default]
    TwoGroup,
    /// `XXXXX-XXXXX-XXXXX-XXXXX-XXXXX`, the passport layout.
    FiveGroup,
}

impl VisaCodeFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "two-group" | "two_group" | "two" | "2" => Some(Self::TwoGroup),
            "five-group" | "five_group" | "five" | "5" => Some(Self::FiveGroup),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VisaCodeFormat::TwoGroup => "two-group",
            VisaCodeFormat::FiveGroup => "five-group",
        }
    }

    pub fn matches(&self, code: &str) -> bool {
        match self {
            VisaCodeFormat::TwoGroup => visa_code_format_valid(code),
            VisaCodeFormat::FiveGroup => passport_format_valid(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn location(value: Value) -> LocationRecord {
        serde_json::from_value(value).expect("location object")
    }

    #[test]
    fn passport_requires_five_groups_of_five() {
        assert!(passport_format_valid("6P294-42HR2-95PSF-93NFF-2TEWF"));
        assert!(passport_format_valid("tjq2r-25stx-Fyc52-02rm0-420DS"));
        assert!(!passport_format_valid("33T0R-8T3T2-W_C77-243GE-42O_D"));
        assert!(!passport_format_valid("T2EW5-WT255-019RW-2RWS4-42FFX-TNX2R"));
        assert!(!passport_format_valid("6P294-42HR2"));
        assert!(!passport_format_valid(""));
    }

    #[test]
    fn visa_code_requires_two_groups_of_five() {
        assert!(visa_code_format_valid("CFR6X-XSMVA"));
        assert!(visa_code_format_valid("abcde-12345"));
        assert!(!visa_code_format_valid("CFR6X-XSMV"));
        assert!(!visa_code_format_valid("CFR6X_XSMVA"));
        assert!(!visa_code_format_valid("6P294-42HR2-95PSF-93NFF-2TEWF"));
    }

    #[test]
    fn visa_code_format_dispatches_to_named_validator() {
        assert!(VisaCodeFormat::TwoGroup.matches("CFR6X-XSMVA"));
        assert!(!VisaCodeFormat::TwoGroup.matches("6P294-42HR2-95PSF-93NFF-2TEWF"));
        assert!(VisaCodeFormat::FiveGroup.matches("6P294-42HR2-95PSF-93NFF-2TEWF"));
        assert!(!VisaCodeFormat::FiveGroup.matches("CFR6X-XSMVA"));
        assert_eq!(
            VisaCodeFormat::parse(" Five-Group "),
            Some(VisaCodeFormat::FiveGroup)
        );
        assert_eq!(VisaCodeFormat::parse("three"), None);
    }

    #[test]
    fn date_format_checks_shape_and_ranges() {
        assert!(date_format_valid("1952-12-25"));
        assert!(date_format_valid("2016-02-29"));
        assert!(date_format_valid("2015-04-30"));
        assert!(date_format_valid("1900-01-01"));

        assert!(!date_format_valid("1899-12-31"));
        assert!(!date_format_valid("2017-01-01"));
        assert!(!date_format_valid("2015-13-01"));
        assert!(!date_format_valid("2015-00-10"));
        assert!(!date_format_valid("2015-04-31"));
        assert!(!date_format_valid("2015-02-30"));
        assert!(!date_format_valid("2015-01-32"));
        assert!(!date_format_valid("2015-01-00"));
        assert!(!date_format_valid("15-01-01"));
        assert!(!date_format_valid("2015/01/01"));
    }

    #[test]
    fn february_allows_twenty_ninth_in_any_year() {
        assert!(date_format_valid("2015-02-29"));
    }

    #[test]
    fn month_day_check_ignores_year() {
        assert!(month_day_valid(2, 29));
        assert!(month_day_valid(12, 31));
        assert!(!month_day_valid(13, 1));
        assert!(!month_day_valid(4, 31));
        assert!(!month_day_valid(2, 30));
        assert!(!month_day_valid(1, 0));
    }

    #[test]
    fn visa_shape_allows_only_code_and_date_strings() {
        let visa =
            |value: Value| -> VisaRecord { serde_json::from_value(value).expect("visa object") };

        assert!(visa_shape_valid(&visa(json!({"code": "CFR6X-XSMVA", "date": "2015-01-01"}))));
        assert!(visa_shape_valid(&visa(json!({"code": "CFR6X-XSMVA"}))));
        assert!(visa_shape_valid(&visa(json!({}))));
        assert!(!visa_shape_valid(&visa(json!({"bogus": 1}))));
        assert!(!visa_shape_valid(&visa(
            json!({"code": "CFR6X-XSMVA", "date": "2015-01-01", "issuer": "ALB"})
        )));
        assert!(!visa_shape_valid(&visa(json!({"code": 12345, "date": "2015-01-01"}))));
    }

    #[test]
    fn location_requires_exact_key_set() {
        assert!(location_valid(&location(
            json!({"city": "a", "region": "b", "country": "KAN"})
        )));
        assert!(location_valid(&location(
            json!({"country": "KAN", "city": "a", "region": "b"})
        )));
        assert!(!location_valid(&location(
            json!({"city": "a", "province": "b", "country": "KAN"})
        )));
        assert!(!location_valid(&location(
            json!({"city": "a", "country": "KAN"})
        )));
        assert!(!location_valid(&location(
            json!({"city": "a", "region": "b", "province": "c", "country": "KAN"})
        )));
        assert!(!location_valid(&location(json!({}))));
    }
}
