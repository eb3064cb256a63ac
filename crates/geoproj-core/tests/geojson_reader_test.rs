//! Integration tests for reading zone datasets from GeoJSON documents

use geoproj_core::formats::{FormatReader, GeoJsonReader};
use geoproj_core::models::ResourceLocator;
use geoproj_core::ports::{FileFetcher, ResourceFetcher};
use tempfile::TempDir;

const CLIMATE_ZONES: &str = r#"{
    "type": "FeatureCollection",
    "crs": { "type": "name", "properties": { "name": "EPSG:4326" } },
    "features": [
        {
            "type": "Feature",
            "properties": { "CLASS_NAME": "Warm Temperate Moist" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-54.0,-27.0],[-48.0,-27.0],[-48.0,-24.0],[-54.0,-24.0],[-54.0,-27.0]]]
            }
        },
        {
            "type": "Feature",
            "properties": { "CLASS_NAME": "Tropical Moist" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-54.0,-24.0],[-48.0,-24.0],[-48.0,-22.0],[-54.0,-22.0],[-54.0,-24.0]]]
            }
        }
    ]
}"#;

#[tokio::test]
async fn test_fetch_then_parse_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ipcc_climate.geojson");
    std::fs::write(&path, CLIMATE_ZONES).unwrap();

    let content = FileFetcher.fetch(&ResourceLocator::Path(path)).await.unwrap();
    let dataset = GeoJsonReader.parse("climate-zone", &content).unwrap();

    assert_eq!(dataset.name, "climate-zone");
    assert_eq!(dataset.crs, 4326);
    assert_eq!(dataset.zones.len(), 2);
    assert_eq!(dataset.skipped, 0);
    assert_eq!(
        dataset.zones[1].attribute(&["CLASS_NAME".to_string()]),
        Some("Tropical Moist".to_string())
    );
}

#[test]
fn test_web_mercator_crs_is_reported() {
    let content = CLIMATE_ZONES.replace("EPSG:4326", "urn:ogc:def:crs:EPSG::3857");
    let dataset = GeoJsonReader.parse("climate-zone", &content).unwrap();
    assert_eq!(dataset.crs, 3857);
}

#[test]
fn test_empty_collection_parses_to_no_zones() {
    let dataset = GeoJsonReader
        .parse("empty", r#"{"type":"FeatureCollection","features":[]}"#)
        .unwrap();
    assert!(dataset.is_empty());
}

#[test]
fn test_bare_polygon_geometry() {
    let dataset = GeoJsonReader
        .parse(
            "boundary",
            r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#,
        )
        .unwrap();
    assert_eq!(dataset.zones.len(), 1);
    assert_eq!(dataset.zones[0].id, "0");
}
