//! geoproj Geo - Geometry, CRS, and point classification
//!
//! This crate handles the geospatial side of project registration: geometry
//! validation and repair, CRS normalization to EPSG:4326, the zone index and
//! the point classifier.

pub mod classify;
pub mod dataset;
pub mod models;
pub mod spatial;
pub mod transform;
pub mod validation;

pub use classify::{resolve_zone, PointClassifier};
pub use dataset::{DatasetSet, ZoneDataset};
