pub mod classification;
pub mod coordinate;
pub mod dataset;
pub mod geometry;
pub mod project;
pub mod viewport;
pub mod zone;

pub use classification::{ClassificationResult, ZoneAttributeKeys, ZoneMatch, UNKNOWN_ZONE};
pub use coordinate::{Coordinate, ProjectedCoordinate};
pub use dataset::{DatasetKind, DatasetMeta, LoadState, ResourceLocator};
pub use geometry::{Crs, Geometry, GeometryType, ValidityMode};
pub use project::{
    CandidateRecord, ProjectDraft, ProjectRecord, RegionConfig, SubmissionOutcome,
    SubmissionPayload, GENERIC_SUBMISSION_FAILURE,
};
pub use viewport::MapViewport;
pub use zone::Zone;
