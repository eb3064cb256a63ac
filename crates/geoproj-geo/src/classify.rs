//! Point classification against the boundary and zone datasets.

use geoproj_core::models::{
    ClassificationResult, Coordinate, LoadState, ZoneAttributeKeys, ZoneMatch,
};

use crate::dataset::{DatasetSet, ZoneDataset};

/// Resolve the zone at `coordinate` in one dataset
///
/// The first containing zone in dataset order decides. Its name is the first
/// usable attribute from `keys`; with none, the zone is `Unnamed`.
///
/// A dataset that failed to load resolves to `Unnamed` everywhere; one still
/// loading matches nothing.
pub fn resolve_zone(dataset: &ZoneDataset, coordinate: Coordinate, keys: &[String]) -> ZoneMatch {
    if let LoadState::Failed(_) = dataset.state() {
        return ZoneMatch::Unnamed;
    }

    match dataset.first_containing(coordinate) {
        None => ZoneMatch::Outside,
        Some(zone) => match zone.attribute(keys) {
            Some(name) => ZoneMatch::Named(name),
            None => ZoneMatch::Unnamed,
        },
    }
}

/// Classifies coordinates; pure over its inputs
#[derive(Debug, Clone, Default)]
pub struct PointClassifier {
    keys: ZoneAttributeKeys,
}

impl PointClassifier {
    pub fn new(keys: ZoneAttributeKeys) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &ZoneAttributeKeys {
        &self.keys
    }

    pub fn classify(
        &self,
        coordinate: Coordinate,
        boundary: &ZoneDataset,
        climate: &ZoneDataset,
        ecological: &ZoneDataset,
    ) -> ClassificationResult {
        // Unready boundary behaves as "outside"
        if !boundary.contains(coordinate) {
            tracing::debug!(%coordinate, "Point outside boundary");
            return ClassificationResult::outside(coordinate);
        }

        let climate_zone = resolve_zone(climate, coordinate, &self.keys.climate).into_field();
        let ecological_zone =
            resolve_zone(ecological, coordinate, &self.keys.ecological).into_field();

        tracing::debug!(
            %coordinate,
            climate = ?climate_zone,
            ecological = ?ecological_zone,
            "Point classified"
        );

        ClassificationResult { coordinate, inside_boundary: true, climate_zone, ecological_zone }
    }

    pub fn classify_set(&self, coordinate: Coordinate, datasets: &DatasetSet) -> ClassificationResult {
        self.classify(coordinate, &datasets.boundary, &datasets.climate, &datasets.ecological)
    }
}
