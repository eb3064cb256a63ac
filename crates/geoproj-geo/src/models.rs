//! Geometry models for geoproj-geo.
//!
//! Re-exports canonical types from `geoproj-core` and converts them to the
//! computational `geo` crate types.

use geo::{Coord, LineString, MultiPolygon, Polygon};

pub use geoproj_core::models::{Crs, Geometry, GeometryType, ValidityMode};

fn to_line_string(ring: &[[f64; 2]]) -> LineString<f64> {
    ring.iter().map(|c| Coord { x: c[0], y: c[1] }).collect::<Vec<_>>().into()
}

fn to_geo_polygon(rings: &[Vec<[f64; 2]>]) -> Polygon<f64> {
    let mut rings = rings.iter().map(|ring| to_line_string(ring));
    let exterior = rings.next().unwrap_or_else(|| LineString::new(vec![]));
    Polygon::new(exterior, rings.collect())
}

/// Convert a zone geometry to a `geo::MultiPolygon`
///
/// A single Polygon becomes a one-member MultiPolygon so containment has one
/// code path.
pub fn to_geo_multi_polygon(geometry: &Geometry) -> MultiPolygon<f64> {
    MultiPolygon::new(geometry.polygons().into_iter().map(|rings| to_geo_polygon(rings)).collect())
}
