//! Command implementations

mod classify;
mod config;
mod datasets;
pub(crate) mod register;

use crate::cli::{Cli, Commands};
use crate::config_loader;
use crate::output::OutputWriter;
use anyhow::{bail, Result};
use geoproj_core::models::Coordinate;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = config_loader::load_config(cli.config.as_deref(), config_loader::overrides(&cli))?;

    match cli.command {
        Commands::Datasets => datasets::execute(&config, &output).await,
        Commands::Classify(args) => classify::execute(args, &config, &output).await,
        Commands::Register(args) => register::execute(args, &config, &output, cli.dry_run).await,
        Commands::Config => config::execute(&config, &output),
    }
}

/// Geographic point from `--lon/--lat`, rejected when out of range or not finite
pub(crate) fn geographic_point(longitude: f64, latitude: f64) -> Result<Coordinate> {
    let coordinate = Coordinate::new(longitude, latitude);
    if !coordinate.is_valid() {
        bail!("Invalid coordinate: longitude {} latitude {}", longitude, latitude);
    }
    Ok(coordinate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geographic_point_range() {
        assert_eq!(geographic_point(-51.5, -24.5).unwrap(), Coordinate::new(-51.5, -24.5));
        assert!(geographic_point(-200.0, 0.0).is_err());
        assert!(geographic_point(0.0, 95.0).is_err());
        assert!(geographic_point(f64::NAN, 0.0).is_err());
    }
}
