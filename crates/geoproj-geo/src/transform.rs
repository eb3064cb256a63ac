//! CRS transformation and normalization
//!
//! Zones are stored in EPSG:4326. The map surface speaks EPSG:3857, which is
//! handled with the closed-form spherical Mercator formulas. Other source
//! CRSs go through `proj` when the `proj` feature is enabled.

use std::f64::consts::FRAC_PI_4;

use geoproj_core::error::{GeoprojError, Result};
use geoproj_core::models::{Coordinate, MapViewport, ProjectedCoordinate};

use crate::models::{Crs, Geometry};

/// WGS 84 semi-major axis used by Web Mercator
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude at which Web Mercator becomes square
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Check if two CRS are the same
pub fn crs_match(crs1: &Crs, crs2: &Crs) -> bool {
    crs1.epsg == crs2.epsg
}

/// Forward Web Mercator projection
///
/// Latitudes beyond the Mercator limit are clamped.
pub fn to_web_mercator(coordinate: Coordinate) -> ProjectedCoordinate {
    let lat = coordinate.latitude.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
    let x = EARTH_RADIUS * coordinate.longitude.to_radians();
    let y = EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    ProjectedCoordinate::new(x, y)
}

/// Inverse Web Mercator projection
pub fn from_web_mercator(projected: ProjectedCoordinate) -> Coordinate {
    let longitude = (projected.x / EARTH_RADIUS).to_degrees();
    let latitude = (2.0 * (projected.y / EARTH_RADIUS).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
    Coordinate::new(longitude, latitude)
}

/// Viewport pan extent in EPSG:3857 as `[min_x, min_y, max_x, max_y]`
pub fn projected_extent(viewport: &MapViewport) -> [f64; 4] {
    let [min_lon, min_lat, max_lon, max_lat] = viewport.extent;
    let min = to_web_mercator(Coordinate::new(min_lon, min_lat));
    let max = to_web_mercator(Coordinate::new(max_lon, max_lat));
    [min.x, min.y, max.x, max.y]
}

/// Bring a dataset geometry into EPSG:4326
///
/// `name` is only used for error reporting.
pub fn reproject_to_wgs84(name: &str, geometry: &Geometry, from_crs: &Crs) -> Result<Geometry> {
    if crs_match(from_crs, &Crs::wgs84()) {
        return Ok(geometry.clone());
    }

    if crs_match(from_crs, &Crs::web_mercator()) {
        return Ok(geometry.map_coords(|[x, y]| {
            from_web_mercator(ProjectedCoordinate::new(x, y)).as_xy()
        }));
    }

    reproject_with_proj(name, geometry, from_crs)
}

#[cfg(feature = "proj")]
fn reproject_with_proj(name: &str, geometry: &Geometry, from_crs: &Crs) -> Result<Geometry> {
    use proj::Proj;

    let from_proj = format!("EPSG:{}", from_crs.epsg);
    let proj = Proj::new_known_crs(&from_proj, "EPSG:4326", None).map_err(|e| {
        GeoprojError::DatasetLoad {
            name: name.to_string(),
            reason: format!("Failed to create projection from {} to EPSG:4326: {}", from_proj, e),
        }
    })?;

    try_map_coords(geometry, |[x, y]| {
        proj.convert((x, y)).map(|(lon, lat)| [lon, lat]).map_err(|e| {
            GeoprojError::DatasetLoad {
                name: name.to_string(),
                reason: format!("Projection failed: {}", e),
            }
        })
    })
}

#[cfg(not(feature = "proj"))]
fn reproject_with_proj(name: &str, _geometry: &Geometry, from_crs: &Crs) -> Result<Geometry> {
    Err(GeoprojError::CrsMismatch { name: name.to_string(), dataset_crs: from_crs.epsg })
}

/// `map_coords` that stops at the first failing vertex
#[cfg_attr(not(feature = "proj"), allow(dead_code))]
fn try_map_coords<F>(geometry: &Geometry, mut f: F) -> Result<Geometry>
where
    F: FnMut([f64; 2]) -> Result<[f64; 2]>,
{
    let mut failure = None;
    let mapped = geometry.map_coords(|c| {
        if failure.is_some() {
            return c;
        }
        match f(c) {
            Ok(converted) => converted,
            Err(e) => {
                failure = Some(e);
                c
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(mapped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    #[test]
    fn test_origin_maps_to_origin() {
        let p = to_web_mercator(Coordinate::new(0.0, 0.0));
        assert!(p.x.abs() < EPSILON);
        assert!(p.y.abs() < EPSILON);
    }

    #[test]
    fn test_known_projection() {
        // Antimeridian on the equator
        let p = to_web_mercator(Coordinate::new(180.0, 0.0));
        assert!((p.x - 20_037_508.342_789_244).abs() < 1e-3);

        let c = from_web_mercator(ProjectedCoordinate::new(-5_732_953.776, -2_814_454.732));
        assert!((c.longitude - -51.5).abs() < 1e-3);
        assert!((c.latitude - -24.5).abs() < 1e-3);
    }

    #[test]
    fn test_round_trip_within_parana() {
        let original = Coordinate::new(-51.123456, -24.654321);
        let back = from_web_mercator(to_web_mercator(original));
        assert!((back.longitude - original.longitude).abs() < EPSILON);
        assert!((back.latitude - original.latitude).abs() < EPSILON);
    }

    #[test]
    fn test_projected_extent_is_ordered() {
        let [min_x, min_y, max_x, max_y] = projected_extent(&MapViewport::default());
        assert!(min_x < max_x);
        assert!(min_y < max_y);
        assert!(min_y < 0.0 && max_y < 0.0);
    }

    #[test]
    fn test_reproject_web_mercator_geometry() {
        let min = to_web_mercator(Coordinate::new(-52.0, -25.0));
        let max = to_web_mercator(Coordinate::new(-51.0, -24.0));
        let geometry = Geometry::rectangle([min.x, min.y], [max.x, max.y]);

        let wgs84 = reproject_to_wgs84("zones", &geometry, &Crs::web_mercator()).unwrap();
        let first = wgs84.polygons()[0][0][0];
        assert!((first[0] - -52.0).abs() < EPSILON);
        assert!((first[1] - -25.0).abs() < EPSILON);
    }

    #[test]
    fn test_wgs84_is_passthrough() {
        let geometry = Geometry::rectangle([0.0, 0.0], [1.0, 1.0]);
        let same = reproject_to_wgs84("zones", &geometry, &Crs::wgs84()).unwrap();
        assert_eq!(same, geometry);
    }

    #[cfg(not(feature = "proj"))]
    #[test]
    fn test_other_crs_needs_proj() {
        let geometry = Geometry::rectangle([0.0, 0.0], [1.0, 1.0]);
        let err = reproject_to_wgs84("zones", &geometry, &Crs::new(31982, "SIRGAS 2000 / UTM 22S"))
            .unwrap_err();
        assert!(matches!(err, GeoprojError::CrsMismatch { dataset_crs: 31982, .. }));
    }
}
