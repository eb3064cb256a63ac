//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use geoproj_core::config::{CliConfigOverrides, LayeredConfig};
use geoproj_core::models::ValidityMode;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, ValidityArg};

/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "geoproj.toml";

/// Load layered configuration: defaults, file, environment, then CLI
///
/// An explicit `path` must exist. Without one, `./geoproj.toml` is read only
/// if present.
pub fn load_config(path: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(file) = config_file(path) {
        config = config
            .load_from_file(&file)
            .with_context(|| format!("Failed to load configuration file {}", file.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    Ok(config)
}

fn config_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(explicit) => Some(explicit.to_path_buf()),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            local.is_file().then_some(local)
        }
    }
}

/// Collect the global flags that override configuration
pub fn overrides(cli: &Cli) -> CliConfigOverrides {
    CliConfigOverrides {
        backend_url: cli.backend_url.clone(),
        boundary_dataset: cli.boundary.clone(),
        climate_dataset: cli.climate.clone(),
        ecological_dataset: cli.ecological.clone(),
        geometry_validity: cli.geometry_validity.map(|mode| match mode {
            ValidityArg::Strict => ValidityMode::Strict,
            ValidityArg::Lenient => ValidityMode::Lenient,
        }),
        owner: cli.owner.clone(),
        project_code: None,
        submit_timeout_secs: cli.timeout,
    }
}
