use crate::models::{Coordinate, MapViewport};

/// Port for the interactive map surface
///
/// Implementations only render; clicks are fed back to the workflow by the
/// host. Calls never block on I/O.
pub trait MapView: Send + Sync {
    /// Apply the initial viewport
    fn configure(&self, viewport: &MapViewport);

    /// Show the single selection marker at `coordinate`, replacing any previous one
    fn place_marker(&self, coordinate: Coordinate);

    /// Remove the selection marker if shown
    fn clear_marker(&self);
}

impl<T: MapView + ?Sized> MapView for std::sync::Arc<T> {
    fn configure(&self, viewport: &MapViewport) {
        (**self).configure(viewport);
    }

    fn place_marker(&self, coordinate: Coordinate) {
        (**self).place_marker(coordinate);
    }

    fn clear_marker(&self) {
        (**self).clear_marker();
    }
}
