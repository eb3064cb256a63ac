//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod fetch;
pub mod map;
pub mod submit;
pub mod validate;

pub use fetch::{FileFetcher, ResourceFetcher};
pub use map::MapView;
pub use submit::ProjectSubmitter;
pub use validate::RecordValidator;
