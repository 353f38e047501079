use super::domain::{Applicant, CountryTable};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum EntryLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid applicant batch: {0}")]
    Applicants(#[source] serde_json::Error),
    #[error("invalid country table: {0}")]
    Countries(#[source] serde_json::Error),
}

/// Reads applicant batches and country tables from JSON documents.
///
/// The whole document is parsed before anything is returned, so a malformed
/// batch never yields a partial list.
pub struct EntryDataLoader;

impl EntryDataLoader {
    pub fn applicants_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Applicant>, EntryLoadError> {
        let reader = open(path.as_ref())?;
        Self::applicants_from_reader(reader)
    }

    pub fn applicants_from_reader<R: Read>(reader: R) -> Result<Vec<Applicant>, EntryLoadError> {
        serde_json::from_reader(reader).map_err(EntryLoadError::Applicants)
    }

    pub fn countries_from_path<P: AsRef<Path>>(path: P) -> Result<CountryTable, EntryLoadError> {
        let reader = open(path.as_ref())?;
        Self::countries_from_reader(reader)
    }

    pub fn countries_from_reader<R: Read>(reader: R) -> Result<CountryTable, EntryLoadError> {
        serde_json::from_reader(reader).map_err(EntryLoadError::Countries)
    }
}

fn open(path: &Path) -> Result<BufReader<std::fs::File>, EntryLoadError> {
    std::fs::File::open(path)
        .map(BufReader::new)
        .map_err(|source| EntryLoadError::Io {
            path: path.to_path_buf(),
            source,
        })
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
