use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Role a zone dataset plays in classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    /// Authoritative region eligible for registration
    Boundary,
    /// IPCC climate classification
    ClimateZone,
    /// Global ecological zones
    EcologicalZone,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] =
        [DatasetKind::Boundary, DatasetKind::ClimateZone, DatasetKind::EcologicalZone];

    /// Default dataset name for this kind
    pub fn default_name(&self) -> &'static str {
        match self {
            DatasetKind::Boundary => "boundary",
            DatasetKind::ClimateZone => "climate-zone",
            DatasetKind::EcologicalZone => "ecological-zone",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DatasetKind::Boundary => "Boundary",
            DatasetKind::ClimateZone => "Climate zone",
            DatasetKind::EcologicalZone => "Ecological zone",
        };
        f.write_str(label)
    }
}

/// Dataset load lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Ready,
    Failed(String),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Ready | LoadState::Failed(_))
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Unloaded => f.write_str("unloaded"),
            LoadState::Loading => f.write_str("loading"),
            LoadState::Ready => f.write_str("ready"),
            LoadState::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// Where a dataset document lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceLocator {
    Path(PathBuf),
    Url(String),
}

impl ResourceLocator {
    /// Interpret `http://` and `https://` strings as URLs, anything else as a path
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ResourceLocator::Url(trimmed.to_string())
        } else {
            ResourceLocator::Path(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLocator::Path(path) => write!(f, "{}", path.display()),
            ResourceLocator::Url(url) => f.write_str(url),
        }
    }
}

/// Dataset summary for status output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMeta {
    /// Dataset name
    pub name: String,

    /// Classification role
    pub kind: DatasetKind,

    /// Current load state
    pub state: LoadState,

    /// Number of usable zones
    pub zone_count: usize,

    /// CRS EPSG code declared by the source document
    pub source_crs: u32,

    /// When the dataset reached a terminal state
    pub loaded_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_parse() {
        assert_eq!(
            ResourceLocator::parse("https://example.org/gez.geojson"),
            ResourceLocator::Url("https://example.org/gez.geojson".to_string())
        );
        assert_eq!(
            ResourceLocator::parse("data/boundary.geojson"),
            ResourceLocator::Path(PathBuf::from("data/boundary.geojson"))
        );
    }

    #[test]
    fn test_load_state_flags() {
        assert!(LoadState::Ready.is_ready());
        assert!(!LoadState::Loading.is_ready());
        assert!(LoadState::Failed("boom".into()).is_terminal());
        assert!(!LoadState::Unloaded.is_terminal());
    }
}
