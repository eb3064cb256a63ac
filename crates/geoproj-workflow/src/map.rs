//! Map surface adapters: lazy construction and a recording view.

use std::sync::{Mutex, OnceLock, PoisonError};

use geoproj_core::models::{Coordinate, MapViewport};
use geoproj_core::ports::MapView;

type MapFactory = Box<dyn FnOnce() -> Box<dyn MapView> + Send>;

/// Builds the real map view the first time it is used
///
/// Hosts that may never show a map (e.g. a non-interactive run) pay nothing
/// for it.
pub struct LazyMapView {
    factory: Mutex<Option<MapFactory>>,
    view: OnceLock<Box<dyn MapView>>,
}

impl LazyMapView {
    pub fn new<F>(factory: F) -> Self
    where
        F: FnOnce() -> Box<dyn MapView> + Send + 'static,
    {
        Self { factory: Mutex::new(Some(Box::new(factory))), view: OnceLock::new() }
    }

    pub fn is_initialized(&self) -> bool {
        self.view.get().is_some()
    }

    fn view(&self) -> &dyn MapView {
        self.view
            .get_or_init(|| {
                let factory = self.factory.lock().unwrap_or_else(PoisonError::into_inner).take();
                match factory {
                    Some(build) => {
                        tracing::debug!("Constructing map view");
                        build()
                    }
                    None => Box::new(RecordingMapView::default()),
                }
            })
            .as_ref()
    }
}

impl MapView for LazyMapView {
    fn configure(&self, viewport: &MapViewport) {
        self.view().configure(viewport);
    }

    fn place_marker(&self, coordinate: Coordinate) {
        self.view().place_marker(coordinate);
    }

    fn clear_marker(&self) {
        self.view().clear_marker();
    }
}

/// One call made on a map view
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    Configure(MapViewport),
    PlaceMarker(Coordinate),
    ClearMarker,
}

/// Map view that only records what it was told
#[derive(Debug, Default)]
pub struct RecordingMapView {
    commands: Mutex<Vec<MapCommand>>,
}

impl RecordingMapView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<MapCommand> {
        self.commands.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Marker position after replaying every command
    pub fn marker(&self) -> Option<Coordinate> {
        self.commands().iter().fold(None, |marker, command| match command {
            MapCommand::PlaceMarker(coordinate) => Some(*coordinate),
            MapCommand::ClearMarker => None,
            MapCommand::Configure(_) => marker,
        })
    }

    fn record(&self, command: MapCommand) {
        self.commands.lock().unwrap_or_else(PoisonError::into_inner).push(command);
    }
}

impl MapView for RecordingMapView {
    fn configure(&self, viewport: &MapViewport) {
        self.record(MapCommand::Configure(viewport.clone()));
    }

    fn place_marker(&self, coordinate: Coordinate) {
        self.record(MapCommand::PlaceMarker(coordinate));
    }

    fn clear_marker(&self) {
        self.record(MapCommand::ClearMarker);
    }
}
