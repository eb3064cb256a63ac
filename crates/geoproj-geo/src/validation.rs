use geoproj_core::error::{GeoprojError, Result};
use geoproj_core::models::Zone;

use crate::models::{Geometry, ValidityMode};

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// All errors as one line
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.location, e.reason))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validate every ring of a zone geometry
pub fn validate_geometry(geometry: &Geometry) -> ValidationResult {
    let mut result = ValidationResult::valid();

    let polygons = geometry.polygons();
    if polygons.is_empty() {
        result.add_error("MultiPolygon".to_string(), "Geometry has no polygons".to_string());
    }

    for (p, rings) in polygons.iter().enumerate() {
        if rings.is_empty() {
            result.add_error(format!("Polygon[{}]", p), "Polygon has no rings".to_string());
        }
        for (r, ring) in rings.iter().enumerate() {
            let location = ring_location(p, r);
            validate_ring(ring, &location, &mut result);
        }
    }

    result
}

fn ring_location(polygon: usize, ring: usize) -> String {
    if ring == 0 {
        format!("Polygon[{}] exterior", polygon)
    } else {
        format!("Polygon[{}] interior[{}]", polygon, ring - 1)
    }
}

fn validate_ring(ring: &[[f64; 2]], location: &str, result: &mut ValidationResult) {
    if ring.len() < 4 {
        result.add_error(
            location.to_string(),
            format!("Ring must have at least 4 points, found {}", ring.len()),
        );
    }

    if ring.iter().any(|c| !c[0].is_finite() || !c[1].is_finite()) {
        result.add_error(location.to_string(), "Coordinates must be finite".to_string());
    }

    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            result.add_error(
                location.to_string(),
                "Ring must be closed (first point == last point)".to_string(),
            );
        }
    }
}

/// Repair a ring: drop non-finite positions and close it.
/// `None` when fewer than 4 positions remain.
fn fix_ring(ring: &[[f64; 2]]) -> Option<Vec<[f64; 2]>> {
    let mut fixed: Vec<[f64; 2]> =
        ring.iter().copied().filter(|c| c[0].is_finite() && c[1].is_finite()).collect();

    if let (Some(first), Some(last)) = (fixed.first().copied(), fixed.last().copied()) {
        if first != last {
            fixed.push(first);
        }
    }

    (fixed.len() >= 4).then_some(fixed)
}

/// Repair what can be repaired
///
/// Bad holes are dropped; a polygon whose exterior cannot be repaired is
/// dropped. `None` when nothing usable remains.
pub fn fix_geometry(geometry: &Geometry) -> Option<Geometry> {
    let fix_polygon = |rings: &Vec<Vec<[f64; 2]>>| -> Option<Vec<Vec<[f64; 2]>>> {
        let mut rings = rings.iter();
        let exterior = fix_ring(rings.next()?)?;
        let mut fixed = vec![exterior];
        fixed.extend(rings.filter_map(|ring| fix_ring(ring)));
        Some(fixed)
    };

    match geometry {
        Geometry::Polygon { coordinates } => fix_polygon(coordinates).map(Geometry::polygon),
        Geometry::MultiPolygon { coordinates } => {
            let polygons: Vec<_> = coordinates.iter().filter_map(fix_polygon).collect();
            (!polygons.is_empty()).then(|| Geometry::multi_polygon(polygons))
        }
    }
}

/// Apply the validity mode to one zone
///
/// Strict mode fails on the first invalid zone. Lenient mode repairs the zone
/// or returns `Ok(None)` so the caller skips it.
pub fn prepare_zone(zone: Zone, mode: ValidityMode) -> Result<Option<Zone>> {
    let result = validate_geometry(&zone.geometry);
    if result.is_valid {
        return Ok(Some(zone));
    }

    match mode {
        ValidityMode::Strict => Err(GeoprojError::InvalidGeometry {
            feature_id: zone.id,
            reason: result.summary(),
        }),
        ValidityMode::Lenient => match fix_geometry(&zone.geometry) {
            Some(geometry) => {
                tracing::warn!(feature_id = %zone.id, issues = %result.summary(), "Repaired zone geometry");
                Ok(Some(Zone { geometry, ..zone }))
            }
            None => {
                tracing::warn!(feature_id = %zone.id, issues = %result.summary(), "Dropped unrepairable zone");
                Ok(None)
            }
        },
    }
}
