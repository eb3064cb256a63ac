use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;

/// Marker for "inside a zone that carries no recognised name attribute"
pub const UNKNOWN_ZONE: &str = "unknown";

/// Outcome of resolving one zone dataset at a point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneMatch {
    /// No zone contains the point, or the dataset is still loading
    Outside,
    /// A zone contains the point but none of the attribute keys are present,
    /// or the dataset failed to load
    Unnamed,
    /// A zone contains the point and has a name
    Named(String),
}

impl ZoneMatch {
    /// Collapse into the classification field representation
    pub fn into_field(self) -> Option<String> {
        match self {
            ZoneMatch::Outside => None,
            ZoneMatch::Unnamed => Some(UNKNOWN_ZONE.to_string()),
            ZoneMatch::Named(name) => Some(name),
        }
    }
}

/// Ordered attribute key chains used to name climate and ecological zones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneAttributeKeys {
    pub climate: Vec<String>,
    pub ecological: Vec<String>,
}

impl Default for ZoneAttributeKeys {
    fn default() -> Self {
        Self {
            climate: vec!["CLASS_NAME".into(), "IPCC_Climate".into(), "name".into()],
            ecological: vec!["gez_name".into(), "GEZ_TERM".into(), "name".into()],
        }
    }
}

/// Per-click classification of a coordinate against the three datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub coordinate: Coordinate,
    pub inside_boundary: bool,
    pub climate_zone: Option<String>,
    pub ecological_zone: Option<String>,
}

impl ClassificationResult {
    /// Result for a point outside the boundary (or an unready boundary)
    pub fn outside(coordinate: Coordinate) -> Self {
        Self { coordinate, inside_boundary: false, climate_zone: None, ecological_zone: None }
    }

    /// Zone value as displayed to the operator
    pub fn display_zone(zone: &Option<String>) -> &str {
        zone.as_deref().unwrap_or("Not identified")
    }
}
