use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// geoproj - Map-driven project registration
#[derive(Parser, Debug)]
#[command(name = "geoproj")]
#[command(about = "Classify points against zone datasets and register projects", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Submit to an in-memory backend instead of the configured URL
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Configuration file (defaults to ./geoproj.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Owner recorded on registered projects
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Boundary dataset path or URL
    #[arg(long, global = true, value_name = "LOCATOR")]
    pub boundary: Option<String>,

    /// Climate zone dataset path or URL
    #[arg(long, global = true, value_name = "LOCATOR")]
    pub climate: Option<String>,

    /// Ecological zone dataset path or URL
    #[arg(long, global = true, value_name = "LOCATOR")]
    pub ecological: Option<String>,

    /// How invalid dataset geometries are handled
    #[arg(long, global = true)]
    pub geometry_validity: Option<ValidityArg>,

    /// Give up on a submission after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ValidityArg {
    /// Reject datasets containing invalid geometry
    Strict,
    /// Repair or drop invalid zones
    Lenient,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the zone datasets and show their state
    Datasets,

    /// Classify a single point
    Classify(ClassifyArgs),

    /// Register a project at a picked location
    Register(RegisterArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Longitude in degrees (EPSG:4326)
    #[arg(long, allow_negative_numbers = true, requires = "lat", conflicts_with_all = ["x", "y"])]
    pub lon: Option<f64>,

    /// Latitude in degrees (EPSG:4326)
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Web Mercator easting in metres (EPSG:3857)
    #[arg(long, allow_negative_numbers = true, requires = "y")]
    pub x: Option<f64>,

    /// Web Mercator northing in metres (EPSG:3857)
    #[arg(long, allow_negative_numbers = true, requires = "x", conflicts_with_all = ["lon", "lat"])]
    pub y: Option<f64>,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Longitude of the project location
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Latitude of the project location
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Project name
    #[arg(long)]
    pub name: Option<String>,

    /// First year of the project period
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last year of the project period
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Prompt for the location and fields
    #[arg(short, long)]
    pub interactive: bool,
}

impl RegisterArgs {
    /// Prompts are used when asked for or when no location was given
    pub fn is_interactive(&self) -> bool {
        self.interactive || self.lon.is_none()
    }
}
