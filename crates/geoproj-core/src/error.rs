//! Error types for geoproj

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoprojError {
    // Dataset errors
    #[error("Failed to load dataset '{name}': {reason}")]
    DatasetLoad { name: String, reason: String },

    #[error("CRS mismatch: dataset '{name}' uses EPSG:{dataset_crs}, expected EPSG:4326")]
    CrsMismatch { name: String, dataset_crs: u32 },

    #[error("Invalid geometry at feature {feature_id}: {reason}")]
    InvalidGeometry { feature_id: String, reason: String },

    // Selection errors
    #[error("Location ({longitude:.6}, {latitude:.6}) is outside the registration boundary")]
    OutOfBounds { longitude: f64, latitude: f64 },

    // Submission errors
    #[error("Cannot submit: {reason}")]
    Precondition { reason: String },

    #[error("Project record is invalid: {0}")]
    Validation(FieldErrors),

    #[error("Submission failed: {message}")]
    Submission { message: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GeoprojError {
    /// Whether the workflow stays usable after this error without user data loss.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GeoprojError::ConfigMissing { .. } | GeoprojError::ConfigInvalid { .. })
    }
}

pub type Result<T> = std::result::Result<T, GeoprojError>;

/// Field-keyed validation messages, ordered by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field. The first message per field wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}
