//! Text rendering of the map surface.

use console::style;
use geoproj_core::models::{Coordinate, MapViewport};
use geoproj_core::ports::MapView;
use geoproj_geo::transform::{projected_extent, to_web_mercator};

/// Reports viewport and marker changes on stderr
pub struct TerminalMapView {
    quiet: bool,
}

impl TerminalMapView {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl MapView for TerminalMapView {
    fn configure(&self, viewport: &MapViewport) {
        let [min_x, min_y, max_x, max_y] = projected_extent(viewport);
        tracing::debug!(
            center = %viewport.center,
            zoom = viewport.zoom,
            min_x, min_y, max_x, max_y,
            "Map configured"
        );
        if !self.quiet {
            let [min_lon, min_lat, max_lon, max_lat] = viewport.extent;
            eprintln!(
                "{} Map centred on {} (zoom {}, extent {:.2},{:.2} to {:.2},{:.2})",
                style("▣").cyan(),
                viewport.center,
                viewport.zoom,
                min_lon,
                min_lat,
                max_lon,
                max_lat
            );
        }
    }

    fn place_marker(&self, coordinate: Coordinate) {
        let projected = to_web_mercator(coordinate);
        tracing::debug!(%coordinate, x = projected.x, y = projected.y, "Marker placed");
        if !self.quiet {
            eprintln!("{} Marker at {}", style("◆").cyan().bold(), coordinate);
        }
    }

    fn clear_marker(&self) {
        tracing::debug!("Marker cleared");
        if !self.quiet {
            eprintln!("{} Marker cleared", style("◇").dim());
        }
    }
}
