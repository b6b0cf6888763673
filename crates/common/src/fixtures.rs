//! JSON fixture loading for the three scenario families

use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::types::{Credential, FormSubmission, ListQuery, ScenarioFamily};

/// Serde adapter for the fixtures' `dd/MM/yyyy` dates
pub mod day_first_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d/%m/%Y";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Parse a JSON array of records from a string
pub fn parse_records<T: DeserializeOwned>(json: &str, origin: &str) -> Result<Vec<T>> {
    serde_json::from_str(json).map_err(|e| Error::MalformedFixture {
        path: origin.to_string(),
        reason: e.to_string(),
    })
}

/// Load a JSON array of records from a file
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(Error::FixtureNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let records = parse_records(&content, &path.display().to_string())?;
    Ok(records)
}

/// The scenario records of one run, in file order
#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
    pub logins: Vec<Credential>,
    pub list_queries: Vec<ListQuery>,
    pub form_submissions: Vec<FormSubmission>,
}

impl FixtureSet {
    /// Load every family from its fixed file name under `dir`.
    ///
    /// A family whose file is missing or malformed is logged and left empty.
    pub fn load_dir(dir: &Path) -> Self {
        Self {
            logins: load_or_empty(dir, ScenarioFamily::Login),
            list_queries: load_or_empty(dir, ScenarioFamily::ListQuery),
            form_submissions: load_or_empty(dir, ScenarioFamily::FormSubmission),
        }
    }

    pub fn len(&self) -> usize {
        self.logins.len() + self.list_queries.len() + self.form_submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn load_or_empty<T: DeserializeOwned>(dir: &Path, family: ScenarioFamily) -> Vec<T> {
    let path = dir.join(family.fixture_file());
    match load_records(&path) {
        Ok(records) => {
            debug!("Loaded {} {} scenario(s) from {}", records.len(), family, path.display());
            records
        }
        Err(e) => {
            error!("Error reading test data for {}: {}", family, e);
            Vec::new()
        }
    }
}
