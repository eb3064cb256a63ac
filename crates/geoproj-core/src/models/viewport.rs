use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;

/// Initial view handed to the map surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewport {
    pub center: Coordinate,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Pan limits as `[min_lon, min_lat, max_lon, max_lat]`
    pub extent: [f64; 4],
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            center: Coordinate::new(-51.5, -24.5),
            zoom: 15.0,
            min_zoom: 4.0,
            max_zoom: 20.0,
            extent: [-54.6, -26.7, -48.0, -22.5],
        }
    }
}

impl MapViewport {
    /// Clamp a zoom level into the allowed range
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Whether a coordinate lies within the pan extent
    pub fn in_extent(&self, coordinate: &Coordinate) -> bool {
        let [min_lon, min_lat, max_lon, max_lat] = self.extent;
        (min_lon..=max_lon).contains(&coordinate.longitude)
            && (min_lat..=max_lat).contains(&coordinate.latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_center_inside_extent() {
        let viewport = MapViewport::default();
        assert!(viewport.in_extent(&viewport.center));
        assert!(!viewport.in_extent(&Coordinate::new(-47.0, -24.0)));
    }

    #[test]
    fn test_clamp_zoom() {
        let viewport = MapViewport::default();
        assert_eq!(viewport.clamp_zoom(1.0), 4.0);
        assert_eq!(viewport.clamp_zoom(25.0), 20.0);
        assert_eq!(viewport.clamp_zoom(12.0), 12.0);
    }
}
