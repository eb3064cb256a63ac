//! Datasets command implementation

use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{DatasetInfo, DatasetRow, DatasetsOutput};
use crate::progress::{create_spinner, finish_error, finish_success};
use anyhow::Result;
use geoproj_backend::HttpFetcher;
use geoproj_core::config::LayeredConfig;
use geoproj_core::formats::GeoJsonReader;
use geoproj_core::models::{DatasetKind, LoadState};
use geoproj_geo::DatasetSet;
use geoproj_workflow::{DatasetLoader, DatasetSources};
use std::sync::{Arc, PoisonError, RwLock};

/// Load the three configured datasets concurrently
///
/// Failures are installed as `Failed` slots rather than returned; callers
/// decide which datasets they cannot do without.
pub(crate) async fn load(config: &LayeredConfig, output: &OutputWriter) -> Arc<RwLock<DatasetSet>> {
    let sources = DatasetSources::from_config(config);
    let datasets = Arc::new(RwLock::new(DatasetSet::new_unloaded()));
    let loader = DatasetLoader::new(HttpFetcher::new(), GeoJsonReader, config.geometry_validity.value);

    let spinner = create_spinner(output, "Loading zone datasets...");
    let results = loader.load_all(&sources, &datasets).await;

    let failed = results.iter().filter(|(_, result)| result.is_err()).count();
    if failed == 0 {
        finish_success(&spinner, "Loaded zone datasets");
    } else {
        finish_error(&spinner, &format!("{} of {} datasets failed to load", failed, results.len()));
    }

    datasets
}

/// Reason the boundary cannot be used, if any
pub(crate) fn boundary_failure(datasets: &RwLock<DatasetSet>) -> Option<String> {
    let datasets = datasets.read().unwrap_or_else(PoisonError::into_inner);
    match datasets.get(DatasetKind::Boundary).state() {
        LoadState::Ready => None,
        LoadState::Failed(reason) => Some(reason.clone()),
        other => Some(format!("dataset is {}", other)),
    }
}

pub async fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let datasets = load(config, output).await;
    let metas = datasets.read().unwrap_or_else(PoisonError::into_inner).metas();
    let infos: Vec<DatasetInfo> = metas.into_iter().map(DatasetInfo::from).collect();

    let failures: Vec<(String, String)> = infos
        .iter()
        .filter(|info| !info.ready)
        .map(|info| (info.name.clone(), info.state.clone()))
        .collect();

    if output.is_json() {
        output.result(DatasetsOutput { datasets: infos })?;
    } else {
        output.section("Zone Datasets");
        output.table(infos.iter().map(DatasetRow::from).collect());
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(errors::datasets_failed(&failures).into())
    }
}
