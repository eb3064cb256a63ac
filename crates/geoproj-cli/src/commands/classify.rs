//! Classify command implementation

use crate::cli::ClassifyArgs;
use crate::commands::{datasets, geographic_point};
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::ClassifyOutput;
use anyhow::{bail, Result};
use geoproj_core::config::LayeredConfig;
use geoproj_core::models::{ClassificationResult, Coordinate, ProjectedCoordinate};
use geoproj_geo::transform::{from_web_mercator, to_web_mercator};
use geoproj_geo::PointClassifier;
use std::sync::PoisonError;

fn resolve_point(args: &ClassifyArgs) -> Result<(Coordinate, ProjectedCoordinate)> {
    match (args.lon, args.lat, args.x, args.y) {
        (Some(lon), Some(lat), _, _) => {
            let coordinate = geographic_point(lon, lat)?;
            Ok((coordinate, to_web_mercator(coordinate)))
        }
        (_, _, Some(x), Some(y)) => {
            let projected = ProjectedCoordinate::new(x, y);
            Ok((from_web_mercator(projected), projected))
        }
        _ => bail!("Provide either --lon and --lat, or --x and --y"),
    }
}

pub async fn execute(args: ClassifyArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let (coordinate, projected) = resolve_point(&args)?;

    let datasets = datasets::load(config, output).await;
    if let Some(reason) = datasets::boundary_failure(&datasets) {
        return Err(errors::boundary_unavailable(&reason).into());
    }

    let classifier = PointClassifier::new(config.attribute_keys());
    let result = {
        let datasets = datasets.read().unwrap_or_else(PoisonError::into_inner);
        classifier.classify_set(coordinate, &datasets)
    };

    if output.is_json() {
        output.result(ClassifyOutput::new(result, projected))?;
        return Ok(());
    }

    output.section("Classification");
    output.kv("Location", result.coordinate);
    output.kv("Web Mercator", format!("x: {:.3}, y: {:.3}", projected.x, projected.y));
    if result.inside_boundary {
        output.kv("Boundary", "inside");
        output.kv("Climate zone", ClassificationResult::display_zone(&result.climate_zone));
        output.kv("Ecological zone", ClassificationResult::display_zone(&result.ecological_zone));
    } else {
        output.kv("Boundary", "outside");
        output.warning("This location is outside the registration boundary");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(lon: Option<f64>, lat: Option<f64>, x: Option<f64>, y: Option<f64>) -> ClassifyArgs {
        ClassifyArgs { lon, lat, x, y }
    }

    #[test]
    fn test_resolve_geographic_point() {
        let (coordinate, projected) = resolve_point(&args(Some(-51.5), Some(-24.5), None, None)).unwrap();
        assert_eq!(coordinate, Coordinate::new(-51.5, -24.5));
        assert!((projected.x - -5_732_953.776).abs() < 1e-2);
    }

    #[test]
    fn test_resolve_projected_point() {
        let (coordinate, _) =
            resolve_point(&args(None, None, Some(-5_732_953.776), Some(-2_814_454.732))).unwrap();
        assert!((coordinate.longitude - -51.5).abs() < 1e-6);
        assert!((coordinate.latitude - -24.5).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_rejects_missing_or_invalid_point() {
        assert!(resolve_point(&args(None, None, None, None)).is_err());
        assert!(resolve_point(&args(Some(-200.0), Some(0.0), None, None)).is_err());
    }
}
