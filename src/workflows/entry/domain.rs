use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Country code of the home nation. Never looked up in the country table.
pub const HOME_COUNTRY_CODE: &str = "KAN";

/// Keys a location record must carry, no more and no fewer.
pub const LOCATION_KEYS: [&str; 3] = ["city", "region", "country"];

/// One border-entry request as submitted.
///
/// Every field is optional at the deserialization layer so that an incomplete
/// record reaches the engine and is rejected there instead of failing the batch.
/// Scalar fields of the wrong JSON type still fail deserialization; location
/// and visa contents are audited by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<LocationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_reason: Option<String>,
    #[serde(
        rename = "from",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub origin: Option<LocationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<LocationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visa: Option<VisaRecord>,
}

impl Applicant {
    /// Names of required keys that are absent, in declaration order.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let present = [
            ("passport", self.passport.is_some()),
            ("first_name", self.first_name.is_some()),
            ("last_name", self.last_name.is_some()),
            ("birth_date", self.birth_date.is_some()),
            ("home", self.home.is_some()),
            ("entry_reason", self.entry_reason.is_some()),
            ("from", self.origin.is_some()),
        ];

        present
            .into_iter()
            .filter(|(_, is_present)| !is_present)
            .map(|(name, _)| name)
            .collect()
    }

    /// Every location present on the record, labelled by its key.
    pub fn locations(&self) -> impl Iterator<Item = (&'static str, &LocationRecord)> {
        [
            ("home", self.home.as_ref()),
            ("from", self.origin.as_ref()),
            ("via", self.via.as_ref()),
        ]
        .into_iter()
        .filter_map(|(label, location)| location.map(|location| (label, location)))
    }

    /// Locations the traveller passed through on the way in. Excludes `home`.
    pub fn travel_locations(&self) -> impl Iterator<Item = (&'static str, &LocationRecord)> {
        self.locations().filter(|(label, _)| *label != "home")
    }

    pub fn home_country(&self) -> Option<&str> {
        self.home.as_ref().and_then(LocationRecord::country)
    }
}

/// Location mapping kept exactly as submitted so its shape can be audited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationRecord(pub Map<String, Value>);

impl LocationRecord {
    pub fn new(city: &str, region: &str, country: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("city".to_string(), Value::from(city));
        fields.insert("region".to_string(), Value::from(region));
        fields.insert("country".to_string(), Value::from(country));
        Self(fields)
    }

    pub fn country(&self) -> Option<&str> {
        self.0.get("country").and_then(Value::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Keys a visa record may carry. Either may be absent.
pub const VISA_KEYS: [&str; 2] = ["code", "date"];

/// Visa details attached to a visitor's application, kept as submitted so
/// unexpected keys can be detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisaRecord(pub Map<String, Value>);

impl VisaRecord {
    pub fn new(code: &str, date: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("code".to_string(), Value::from(code));
        fields.insert("date".to_string(), Value::from(date));
        Self(fields)
    }

    pub fn code(&self) -> Option<&str> {
        self.0.get("code").and_then(Value::as_str)
    }

    pub fn date(&self) -> Option<&str> {
        self.0.get("date").and_then(Value::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Reference entry describing entry requirements for one country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "flag_from_value")]
    pub visitor_visa_required: bool,
    #[serde(default, deserialize_with = "flag_from_value")]
    pub transit_visa_required: bool,
    #[serde(default)]
    pub medical_advisory: String,
}

impl Country {
    pub fn has_medical_advisory(&self) -> bool {
        !self.medical_advisory.is_empty()
    }
}

/// Flags are transmitted as `"0"`/`"1"`; only the string `"1"` is true.
fn flag_from_value<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(matches!(value, Value::String(ref raw) if raw == "1"))
}

/// Country reference data keyed by country code. Read-only during evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryTable(BTreeMap<String, Country>);

impl CountryTable {
    pub fn new(countries: BTreeMap<String, Country>) -> Self {
        Self(countries)
    }

    pub fn get(&self, code: &str) -> Option<&Country> {
        self.0.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Country> for CountryTable {
    fn from_iter<I: IntoIterator<Item = Country>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|country| (country.code.clone(), country))
                .collect(),
        )
    }
}

/// Final classification of an applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disposition {
    Accept,
    Reject,
    Quarantine,
}

impl Disposition {
    pub fn label(&self) -> &'static str {
        match self {
            Disposition::Accept => "Accept",
            Disposition::Reject => "Reject",
            Disposition::Quarantine => "Quarantine",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
