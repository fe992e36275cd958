//! Filter metadata offered to search surfaces.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mock::MockGenerator;
use crate::types::TalentResult;

/// Values the UI can offer for each structured filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOptions {
    pub technologies: Vec<String>,
    #[serde(alias = "domainExperience")]
    pub domains: Vec<String>,
    pub regions: Vec<String>,
    pub countries: Vec<String>,
    pub cities: Vec<String>,
    pub availability: Vec<String>,
    pub certifications: Vec<String>,
}

impl FilterOptions {
    /// Parse the filter-options payload, unwrapping a `data` envelope if present.
    pub fn from_value(body: Value) -> TalentResult<Self> {
        let body = match body {
            Value::Object(mut obj) if obj.get("data").is_some_and(Value::is_object) => {
                obj.remove("data").unwrap_or_default()
            }
            other => other,
        };
        Ok(serde_json::from_value(body)?)
    }

    /// Options derived from the sample pool, for when the backend is down.
    pub fn builtin(mock: &MockGenerator) -> Self {
        let mut options = Self {
            technologies: mock.technologies(),
            ..Self::default()
        };
        for profile in mock.pool() {
            push_unique(&mut options.regions, profile.region);
            push_unique(&mut options.countries, profile.country);
            push_unique(&mut options.cities, profile.city);
            push_unique(&mut options.availability, profile.availability);
        }
        options
    }

    pub fn is_empty(&self) -> bool {
        self.technologies.is_empty()
            && self.domains.is_empty()
            && self.regions.is_empty()
            && self.countries.is_empty()
            && self.cities.is_empty()
            && self.availability.is_empty()
            && self.certifications.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
