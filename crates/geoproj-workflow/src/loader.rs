//! Dataset loading: fetch, parse, normalize and install zone datasets.

use std::sync::{PoisonError, RwLock};

use geoproj_core::config::LayeredConfig;
use geoproj_core::error::{GeoprojError, Result};
use geoproj_core::formats::FormatReader;
use geoproj_core::models::{Crs, DatasetKind, ResourceLocator, ValidityMode, Zone};
use geoproj_core::ports::ResourceFetcher;
use geoproj_geo::transform::reproject_to_wgs84;
use geoproj_geo::validation::prepare_zone;
use geoproj_geo::{DatasetSet, ZoneDataset};

/// Where one dataset comes from
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSource {
    pub name: String,
    pub kind: DatasetKind,
    pub locator: ResourceLocator,
}

impl DatasetSource {
    pub fn new(kind: DatasetKind, locator: ResourceLocator) -> Self {
        Self { name: kind.default_name().to_string(), kind, locator }
    }
}

/// Sources for the three required datasets
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSources {
    pub boundary: DatasetSource,
    pub climate: DatasetSource,
    pub ecological: DatasetSource,
}

impl DatasetSources {
    pub fn from_config(config: &LayeredConfig) -> Self {
        let source = |kind| DatasetSource::new(kind, config.dataset_locator(kind));
        Self {
            boundary: source(DatasetKind::Boundary),
            climate: source(DatasetKind::ClimateZone),
            ecological: source(DatasetKind::EcologicalZone),
        }
    }
}

/// Loads zone datasets through a fetcher and a format reader
pub struct DatasetLoader<F, R> {
    fetcher: F,
    reader: R,
    validity: ValidityMode,
}

impl<F, R> DatasetLoader<F, R>
where
    F: ResourceFetcher,
    R: FormatReader,
{
    pub fn new(fetcher: F, reader: R, validity: ValidityMode) -> Self {
        Self { fetcher, reader, validity }
    }

    /// Fetch and parse one dataset into a Ready `ZoneDataset`
    ///
    /// Every failure is reported as `DatasetLoad` for `name`. No retry.
    pub async fn load(
        &self,
        name: &str,
        kind: DatasetKind,
        locator: &ResourceLocator,
    ) -> Result<ZoneDataset> {
        tracing::info!(dataset = name, source = %locator, "Loading dataset");

        let content = self.fetcher.fetch(locator).await.map_err(|e| as_load_error(name, e))?;
        self.build(name, kind, &content).map_err(|e| as_load_error(name, e))
    }

    fn build(&self, name: &str, kind: DatasetKind, content: &str) -> Result<ZoneDataset> {
        let parsed = self.reader.parse(name, content)?;
        let source_crs = Crs::new(parsed.crs, format!("EPSG:{}", parsed.crs));

        let total = parsed.zones.len();
        let mut zones = Vec::with_capacity(total);
        for zone in parsed.zones {
            let Some(zone) = prepare_zone(zone, self.validity)? else {
                continue;
            };
            let geometry = reproject_to_wgs84(name, &zone.geometry, &source_crs)?;
            zones.push(Zone { geometry, ..zone });
        }

        tracing::info!(
            dataset = name,
            zones = zones.len(),
            dropped = total - zones.len(),
            skipped = parsed.skipped,
            crs = parsed.crs,
            "Dataset ready"
        );

        Ok(ZoneDataset::ready(name, kind, zones, parsed.crs))
    }

    /// Load one source and install the outcome into `datasets`
    ///
    /// The slot reads Loading while the fetch runs and ends Ready or Failed.
    pub async fn load_into(&self, source: &DatasetSource, datasets: &RwLock<DatasetSet>) -> Result<()> {
        datasets.write().unwrap_or_else(PoisonError::into_inner).mark_loading(source.kind);

        let (dataset, outcome) = match self.load(&source.name, source.kind, &source.locator).await {
            Ok(dataset) => (dataset, Ok(())),
            Err(e) => {
                tracing::warn!(dataset = %source.name, error = %e, "Dataset failed to load");
                (ZoneDataset::failed(&source.name, source.kind, e.to_string()), Err(e))
            }
        };

        datasets.write().unwrap_or_else(PoisonError::into_inner).install(dataset);
        outcome
    }

    /// Load all three datasets concurrently
    ///
    /// Each dataset is installed as soon as its own load finishes. Results
    /// are returned in boundary, climate, ecological order.
    pub async fn load_all(
        &self,
        sources: &DatasetSources,
        datasets: &RwLock<DatasetSet>,
    ) -> Vec<(DatasetKind, Result<()>)> {
        let (boundary, climate, ecological) = futures::join!(
            self.load_into(&sources.boundary, datasets),
            self.load_into(&sources.climate, datasets),
            self.load_into(&sources.ecological, datasets),
        );

        vec![
            (DatasetKind::Boundary, boundary),
            (DatasetKind::ClimateZone, climate),
            (DatasetKind::EcologicalZone, ecological),
        ]
    }
}

fn as_load_error(name: &str, error: GeoprojError) -> GeoprojError {
    let reason = match error {
        GeoprojError::DatasetLoad { reason, .. } => reason,
        other => other.to_string(),
    };
    GeoprojError::DatasetLoad { name: name.to_string(), reason }
}
