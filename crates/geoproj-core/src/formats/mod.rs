//! Format abstraction for zone datasets
//!
//! A reader turns raw document text into a `FormatDataset`. Fetching the text
//! is the job of a `ResourceFetcher`, so readers stay synchronous and pure.

use crate::error::Result;
use crate::models::Zone;

pub mod geojson;

pub use self::geojson::GeoJsonReader;

/// Format reader trait that all zone formats implement
pub trait FormatReader: Send + Sync {
    /// Parse a document into zones
    ///
    /// `name` is used for error messages and the resulting dataset name.
    fn parse(&self, name: &str, content: &str) -> Result<FormatDataset>;

    /// Get supported file extensions (e.g., ["geojson"])
    fn supported_extensions(&self) -> &[&str];

    /// Get human-readable format name
    fn format_name(&self) -> &str;

    /// Whether this reader claims a file by extension
    fn supports(&self, locator: &str) -> bool {
        let lower = locator.to_lowercase();
        self.supported_extensions()
            .iter()
            .any(|ext| lower.ends_with(&format!(".{}", ext)))
    }
}

/// Zones parsed from one document, in document order
#[derive(Debug, Clone)]
pub struct FormatDataset {
    /// Dataset name
    pub name: String,

    /// CRS EPSG code declared by the document (4326 when absent)
    pub crs: u32,

    /// Polygonal features
    pub zones: Vec<Zone>,

    /// Features dropped because they carry no polygonal geometry
    pub skipped: usize,
}

impl FormatDataset {
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
