//! Zone datasets and the three-slot dataset set used by classification.

use chrono::{DateTime, Utc};
use geo::MultiPolygon;
use geoproj_core::models::{Coordinate, DatasetKind, DatasetMeta, LoadState, Zone};

use crate::models::to_geo_multi_polygon;
use crate::spatial::{point_in_shape, ZoneIndex};

/// A named polygon collection
///
/// Zones keep their source order. A Ready dataset is never mutated; loading
/// again means building a new `ZoneDataset`.
#[derive(Debug)]
pub struct ZoneDataset {
    name: String,
    kind: DatasetKind,
    state: LoadState,
    zones: Vec<Zone>,
    shapes: Vec<MultiPolygon<f64>>,
    index: ZoneIndex,
    source_crs: u32,
    loaded_at: Option<DateTime<Utc>>,
}

impl ZoneDataset {
    /// Placeholder for a dataset that has not started loading
    pub fn new(name: impl Into<String>, kind: DatasetKind) -> Self {
        Self {
            name: name.into(),
            kind,
            state: LoadState::Unloaded,
            zones: Vec::new(),
            shapes: Vec::new(),
            index: ZoneIndex::default(),
            source_crs: 4326,
            loaded_at: None,
        }
    }

    /// Ready dataset from zones already in EPSG:4326
    pub fn ready(
        name: impl Into<String>,
        kind: DatasetKind,
        zones: Vec<Zone>,
        source_crs: u32,
    ) -> Self {
        let shapes: Vec<MultiPolygon<f64>> =
            zones.iter().map(|zone| to_geo_multi_polygon(&zone.geometry)).collect();
        let index = ZoneIndex::from_shapes(&shapes);

        Self {
            name: name.into(),
            kind,
            state: LoadState::Ready,
            zones,
            shapes,
            index,
            source_crs,
            loaded_at: Some(Utc::now()),
        }
    }

    /// Dataset whose load failed
    pub fn failed(name: impl Into<String>, kind: DatasetKind, reason: impl Into<String>) -> Self {
        Self {
            state: LoadState::Failed(reason.into()),
            loaded_at: Some(Utc::now()),
            ..Self::new(name, kind)
        }
    }

    /// Unloaded → Loading. Other states are left alone.
    pub fn mark_loading(&mut self) {
        if self.state == LoadState::Unloaded {
            self.state = LoadState::Loading;
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// First zone in dataset order containing the point; `None` unless Ready
    pub fn first_containing(&self, coordinate: Coordinate) -> Option<&Zone> {
        if !self.is_ready() {
            return None;
        }
        self.index
            .candidates(coordinate)
            .into_iter()
            .find(|&position| point_in_shape(&self.shapes[position], coordinate))
            .map(|position| &self.zones[position])
    }

    /// Whether any zone contains the point; `false` unless Ready
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.first_containing(coordinate).is_some()
    }

    pub fn meta(&self) -> DatasetMeta {
        DatasetMeta {
            name: self.name.clone(),
            kind: self.kind,
            state: self.state.clone(),
            zone_count: self.zones.len(),
            source_crs: self.source_crs,
            loaded_at: self.loaded_at,
        }
    }
}

/// The boundary, climate and ecological datasets
#[derive(Debug)]
pub struct DatasetSet {
    pub boundary: ZoneDataset,
    pub climate: ZoneDataset,
    pub ecological: ZoneDataset,
}

impl Default for DatasetSet {
    fn default() -> Self {
        Self::new_unloaded()
    }
}

impl DatasetSet {
    /// All three slots Unloaded, named after their kind
    pub fn new_unloaded() -> Self {
        let slot = |kind: DatasetKind| ZoneDataset::new(kind.default_name(), kind);
        Self {
            boundary: slot(DatasetKind::Boundary),
            climate: slot(DatasetKind::ClimateZone),
            ecological: slot(DatasetKind::EcologicalZone),
        }
    }

    pub fn get(&self, kind: DatasetKind) -> &ZoneDataset {
        match kind {
            DatasetKind::Boundary => &self.boundary,
            DatasetKind::ClimateZone => &self.climate,
            DatasetKind::EcologicalZone => &self.ecological,
        }
    }

    fn slot_mut(&mut self, kind: DatasetKind) -> &mut ZoneDataset {
        match kind {
            DatasetKind::Boundary => &mut self.boundary,
            DatasetKind::ClimateZone => &mut self.climate,
            DatasetKind::EcologicalZone => &mut self.ecological,
        }
    }

    pub fn mark_loading(&mut self, kind: DatasetKind) {
        self.slot_mut(kind).mark_loading();
    }

    /// Put a finished dataset into its slot
    ///
    /// Returns `false` and keeps the current dataset when the slot is
    /// already Ready.
    pub fn install(&mut self, dataset: ZoneDataset) -> bool {
        let slot = self.slot_mut(dataset.kind());
        if slot.is_ready() {
            tracing::warn!(dataset = %dataset.name(), "Dataset already loaded, ignoring reload");
            return false;
        }
        *slot = dataset;
        true
    }

    pub fn metas(&self) -> Vec<DatasetMeta> {
        DatasetKind::ALL.iter().map(|kind| self.get(*kind).meta()).collect()
    }

    /// Every slot reached Ready or Failed
    pub fn all_settled(&self) -> bool {
        DatasetKind::ALL.iter().all(|kind| self.get(*kind).state().is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoproj_core::models::Geometry;
    use serde_json::Map;

    fn square(id: &str, min: [f64; 2], max: [f64; 2]) -> Zone {
        Zone::new(id, Geometry::rectangle(min, max), Map::new())
    }

    #[test]
    fn test_first_containing_respects_order() {
        let dataset = ZoneDataset::ready(
            "climate-zone",
            DatasetKind::ClimateZone,
            vec![
                square("late", [5.0, 5.0], [6.0, 6.0]),
                square("wide", [0.0, 0.0], [10.0, 10.0]),
                square("inner", [5.0, 5.0], [6.0, 6.0]),
            ],
            4326,
        );

        assert_eq!(dataset.first_containing(Coordinate::new(5.5, 5.5)).unwrap().id, "late");
        assert_eq!(dataset.first_containing(Coordinate::new(1.0, 1.0)).unwrap().id, "wide");
        assert!(dataset.first_containing(Coordinate::new(11.0, 1.0)).is_none());
    }

    fn ring(min: [f64; 2], max: [f64; 2]) -> Vec<[f64; 2]> {
        vec![[min[0], min[1]], [max[0], min[1]], [max[0], max[1]], [min[0], max[1]], [min[0], min[1]]]
    }

    #[test]
    fn test_second_multipolygon_member_matches() {
        let islands = Geometry::multi_polygon(vec![
            vec![ring([0.0, 0.0], [1.0, 1.0])],
            vec![ring([20.0, 20.0], [21.0, 21.0])],
        ]);
        let dataset = ZoneDataset::ready(
            "ecological-zone",
            DatasetKind::EcologicalZone,
            vec![Zone::new("islands", islands, Map::new()), square("mainland", [10.0, 10.0], [30.0, 30.0])],
            4326,
        );

        assert_eq!(dataset.first_containing(Coordinate::new(20.5, 20.5)).unwrap().id, "islands");
        assert_eq!(dataset.first_containing(Coordinate::new(15.0, 15.0)).unwrap().id, "mainland");
        assert!(dataset.first_containing(Coordinate::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_hole_falls_through_to_later_zone() {
        let donut = Geometry::polygon(vec![ring([0.0, 0.0], [10.0, 10.0]), ring([4.0, 4.0], [6.0, 6.0])]);
        let dataset = ZoneDataset::ready(
            "climate-zone",
            DatasetKind::ClimateZone,
            vec![Zone::new("donut", donut, Map::new()), square("core", [3.0, 3.0], [7.0, 7.0])],
            4326,
        );

        assert_eq!(dataset.first_containing(Coordinate::new(5.0, 5.0)).unwrap().id, "core");
        assert_eq!(dataset.first_containing(Coordinate::new(3.5, 3.5)).unwrap().id, "donut");
        assert_eq!(dataset.first_containing(Coordinate::new(1.0, 1.0)).unwrap().id, "donut");
    }

    #[test]
    fn test_not_ready_matches_nothing() {
        let mut dataset = ZoneDataset::new("boundary", DatasetKind::Boundary);
        dataset.mark_loading();
        assert_eq!(dataset.state(), &LoadState::Loading);
        assert!(!dataset.contains(Coordinate::new(0.0, 0.0)));

        let failed = ZoneDataset::failed("boundary", DatasetKind::Boundary, "404");
        assert!(!failed.contains(Coordinate::new(0.0, 0.0)));
        assert_eq!(failed.meta().state, LoadState::Failed("404".to_string()));
    }

    #[test]
    fn test_install_keeps_ready_dataset() {
        let mut set = DatasetSet::new_unloaded();
        assert!(!set.all_settled());

        let ready = ZoneDataset::ready(
            "boundary",
            DatasetKind::Boundary,
            vec![square("pr", [0.0, 0.0], [1.0, 1.0])],
            4326,
        );
        assert!(set.install(ready));
        assert!(!set.install(ZoneDataset::failed("boundary", DatasetKind::Boundary, "late")));
        assert!(set.boundary.is_ready());

        set.install(ZoneDataset::failed("c", DatasetKind::ClimateZone, "x"));
        set.install(ZoneDataset::failed("e", DatasetKind::EcologicalZone, "x"));
        assert!(set.all_settled());
        assert_eq!(set.metas().len(), 3);
    }
}
