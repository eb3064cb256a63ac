//! GeoJSON zone reader

use geojson::{GeoJson, Position};
use serde_json::Map;

use crate::error::{GeoprojError, Result};
use crate::formats::{FormatDataset, FormatReader};
use crate::models::{Geometry, Zone};

/// GeoJSON format reader
///
/// Accepts a FeatureCollection, a single Feature or a bare Geometry.
/// Only Polygon and MultiPolygon features become zones.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonReader;

impl FormatReader for GeoJsonReader {
    fn parse(&self, name: &str, content: &str) -> Result<FormatDataset> {
        let geojson: GeoJson = content.parse().map_err(|e| GeoprojError::DatasetLoad {
            name: name.to_string(),
            reason: format!("Failed to parse GeoJSON: {}", e),
        })?;

        let mut zones = Vec::new();
        let mut skipped = 0;

        let crs = match geojson {
            GeoJson::FeatureCollection(fc) => {
                for (idx, feature) in fc.features.iter().enumerate() {
                    match convert_feature(feature, idx) {
                        Some(zone) => zones.push(zone),
                        None => skipped += 1,
                    }
                }

                // Legacy named CRS member; RFC 7946 documents are always WGS 84
                fc.foreign_members
                    .as_ref()
                    .and_then(|fm| fm.get("crs"))
                    .and_then(extract_epsg_from_crs)
                    .unwrap_or(4326)
            }
            GeoJson::Feature(feature) => {
                match convert_feature(&feature, 0) {
                    Some(zone) => zones.push(zone),
                    None => skipped += 1,
                }
                4326
            }
            GeoJson::Geometry(geom) => {
                match convert_geometry(&geom.value) {
                    Some(geometry) => zones.push(Zone::new("0", geometry, Map::new())),
                    None => skipped += 1,
                }
                4326
            }
        };

        if skipped > 0 {
            tracing::warn!(
                dataset = name,
                skipped,
                "Skipped features without polygonal geometry"
            );
        }

        Ok(FormatDataset { name: name.to_string(), crs, zones, skipped })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json", "geojson"]
    }

    fn format_name(&self) -> &str {
        "GeoJSON"
    }
}

/// Convert a GeoJSON feature to a zone, `None` when it is not polygonal
fn convert_feature(feature: &geojson::Feature, idx: usize) -> Option<Zone> {
    let geometry = convert_geometry(&feature.geometry.as_ref()?.value)?;

    // Get feature ID (use index if not present)
    let id = feature
        .id
        .as_ref()
        .map(|id| match id {
            geojson::feature::Id::String(s) => s.clone(),
            geojson::feature::Id::Number(n) => n.to_string(),
        })
        .unwrap_or_else(|| idx.to_string());

    let properties = feature.properties.clone().unwrap_or_default();

    Some(Zone::new(id, geometry, properties))
}

fn convert_geometry(value: &geojson::Value) -> Option<Geometry> {
    match value {
        geojson::Value::Polygon(rings) => Some(Geometry::polygon(convert_rings(rings))),
        geojson::Value::MultiPolygon(polygons) => Some(Geometry::multi_polygon(
            polygons.iter().map(|rings| convert_rings(rings)).collect(),
        )),
        _ => None,
    }
}

/// Drops any Z/M ordinates; positions with fewer than two ordinates are skipped
fn convert_rings(rings: &[Vec<Position>]) -> Vec<Vec<[f64; 2]>> {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .filter(|pos| pos.len() >= 2)
                .map(|pos| [pos[0], pos[1]])
                .collect()
        })
        .collect()
}

/// Extract EPSG code from a legacy `crs` member
fn extract_epsg_from_crs(crs: &serde_json::Value) -> Option<u32> {
    let name = crs.get("properties")?.get("name")?.as_str()?;

    // "EPSG:4326", "urn:ogc:def:crs:EPSG::3857", "urn:ogc:def:crs:OGC:1.3:CRS84"
    let code = name.rsplit(':').next()?;
    if code.eq_ignore_ascii_case("CRS84") {
        return Some(4326);
    }
    code.parse().ok()
}
