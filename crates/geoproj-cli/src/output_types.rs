use chrono::{DateTime, Utc};
use geoproj_core::models::{
    ClassificationResult, Coordinate, DatasetKind, DatasetMeta, ProjectedCoordinate,
};
use serde::Serialize;
use tabled::Tabled;

/// Output for datasets command
#[derive(Debug, Serialize)]
pub struct DatasetsOutput {
    pub datasets: Vec<DatasetInfo>,
}

#[derive(Debug, Serialize)]
pub struct DatasetInfo {
    pub name: String,
    pub kind: DatasetKind,
    pub state: String,
    pub ready: bool,
    pub zone_count: usize,
    pub source_crs: u32,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl From<DatasetMeta> for DatasetInfo {
    fn from(meta: DatasetMeta) -> Self {
        Self {
            name: meta.name,
            kind: meta.kind,
            ready: meta.state.is_ready(),
            state: meta.state.to_string(),
            zone_count: meta.zone_count,
            source_crs: meta.source_crs,
            loaded_at: meta.loaded_at,
        }
    }
}

#[derive(Debug, Tabled)]
pub struct DatasetRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "State")]
    pub state: String,
    #[tabled(rename = "Zones")]
    pub zones: usize,
    #[tabled(rename = "CRS")]
    pub crs: String,
}

impl From<&DatasetInfo> for DatasetRow {
    fn from(info: &DatasetInfo) -> Self {
        Self {
            name: info.name.clone(),
            kind: info.kind.to_string(),
            state: info.state.clone(),
            zones: info.zone_count,
            crs: format!("EPSG:{}", info.source_crs),
        }
    }
}

/// Output for classify command
#[derive(Debug, Serialize)]
pub struct ClassifyOutput {
    pub coordinate: Coordinate,
    pub projected: ProjectedCoordinate,
    pub inside_boundary: bool,
    pub climate_zone: Option<String>,
    pub ecological_zone: Option<String>,
}

impl ClassifyOutput {
    pub fn new(result: ClassificationResult, projected: ProjectedCoordinate) -> Self {
        Self {
            coordinate: result.coordinate,
            projected,
            inside_boundary: result.inside_boundary,
            climate_zone: result.climate_zone,
            ecological_zone: result.ecological_zone,
        }
    }
}

/// Output for register command
#[derive(Debug, Serialize)]
pub struct RegisterOutput {
    pub name: String,
    pub location: Coordinate,
    pub climate_zone: Option<String>,
    pub ecological_zone: Option<String>,
    pub start_year: i32,
    pub end_year: i32,
    pub period_years: i32,
    pub dry_run: bool,
    pub response: serde_json::Value,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
