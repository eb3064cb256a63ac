use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic position in degrees (EPSG:4326)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }

    /// Both components are finite and within the geographic range
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Coordinate pair as `[x, y]`
    pub fn as_xy(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Latitude: {:.6}, Longitude: {:.6}", self.latitude, self.longitude)
    }
}

/// Map-surface position in Web Mercator metres (EPSG:3857)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCoordinate {
    pub x: f64,
    pub y: f64,
}

impl ProjectedCoordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_six_decimals() {
        let coord = Coordinate::new(-51.5, -24.123456789);
        assert_eq!(coord.to_string(), "Latitude: -24.123457, Longitude: -51.500000");
    }

    #[test]
    fn test_validity() {
        assert!(Coordinate::new(-51.5, -24.5).is_valid());
        assert!(!Coordinate::new(-181.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::NAN).is_valid());
    }
}
