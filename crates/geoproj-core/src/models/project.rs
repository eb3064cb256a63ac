use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;

/// Message surfaced when the backend gives no usable error text
pub const GENERIC_SUBMISSION_FAILURE: &str = "Failed to register project";

/// Fixed region literals attached to every project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Country/region shown on the form and checked by the validator
    pub country_region: String,

    /// `location` value sent to the backend
    pub location_label: String,

    /// `state` value sent to the backend
    pub state_label: String,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            country_region: "Brasil - Paraná".to_string(),
            location_label: "Brazil".to_string(),
            state_label: "Parana".to_string(),
        }
    }
}

/// Fields the operator types in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>, start_year: i32, end_year: i32) -> Self {
        Self { name: name.into(), start_year: Some(start_year), end_year: Some(end_year) }
    }

    /// Inclusive period length in years, 0 until both bounds are set
    pub fn period_years(&self) -> i32 {
        match (self.start_year, self.end_year) {
            (Some(start), Some(end)) => end - start + 1,
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.start_year.is_none() && self.end_year.is_none()
    }
}

/// Draft merged with server-assigned fields and the current selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    pub owner: String,
    pub code: u64,
    pub location: Option<Coordinate>,
    pub country_region: String,
    pub climate_zone: String,
    pub ecological_zone: String,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

/// Candidate record accepted by a validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    pub owner: String,
    pub code: u64,
    pub location: Coordinate,
    pub country_region: String,
    pub climate_zone: String,
    pub ecological_zone: String,
    pub start_year: i32,
    pub end_year: i32,
}

/// JSON body of the project registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub name: String,
    pub location: String,
    pub state: String,
    pub climate_zone: String,
    pub ecological_zone: String,
    pub start_period: String,
    pub end_period: String,
}

impl SubmissionPayload {
    pub fn from_record(record: &ProjectRecord, region: &RegionConfig) -> Self {
        Self {
            name: record.name.clone(),
            location: region.location_label.clone(),
            state: region.state_label.clone(),
            climate_zone: record.climate_zone.clone(),
            ecological_zone: record.ecological_zone.clone(),
            start_period: format!("{}-01-01", record.start_year),
            end_period: format!("{}-01-01", record.end_year),
        }
    }
}

/// Result of the most recent submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Pending,
    Succeeded(serde_json::Value),
    Failed(String),
}
