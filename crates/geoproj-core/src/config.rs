use crate::error::{GeoprojError, Result};
use crate::models::{
    DatasetKind, MapViewport, RegionConfig, ResourceLocator, ValidityMode, ZoneAttributeKeys,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for geoproj
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub backend_url: ConfigValue<String>,
    pub project_path: ConfigValue<String>,
    pub boundary_dataset: ConfigValue<String>,
    pub climate_dataset: ConfigValue<String>,
    pub ecological_dataset: ConfigValue<String>,
    pub climate_keys: ConfigValue<Vec<String>>,
    pub ecological_keys: ConfigValue<Vec<String>>,
    pub geometry_validity: ConfigValue<ValidityMode>,
    pub owner: ConfigValue<String>,
    pub project_code: ConfigValue<u64>,
    pub submit_timeout_secs: ConfigValue<Option<u64>>,
    pub region: ConfigValue<RegionConfig>,
    pub viewport: ConfigValue<MapViewport>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let keys = ZoneAttributeKeys::default();
        Self {
            backend_url: ConfigValue::new(
                "http://localhost:8888".to_string(),
                ConfigSource::Default,
            ),
            project_path: ConfigValue::new("/project".to_string(), ConfigSource::Default),
            boundary_dataset: ConfigValue::new(
                "data/boundary.geojson".to_string(),
                ConfigSource::Default,
            ),
            climate_dataset: ConfigValue::new(
                "data/ipcc_climate.geojson".to_string(),
                ConfigSource::Default,
            ),
            ecological_dataset: ConfigValue::new(
                "data/gez.geojson".to_string(),
                ConfigSource::Default,
            ),
            climate_keys: ConfigValue::new(keys.climate, ConfigSource::Default),
            ecological_keys: ConfigValue::new(keys.ecological, ConfigSource::Default),
            geometry_validity: ConfigValue::new(ValidityMode::Lenient, ConfigSource::Default),
            owner: ConfigValue::new("Test User".to_string(), ConfigSource::Default),
            project_code: ConfigValue::new(12345, ConfigSource::Default),
            submit_timeout_secs: ConfigValue::new(None, ConfigSource::Default),
            region: ConfigValue::new(RegionConfig::default(), ConfigSource::Default),
            viewport: ConfigValue::new(MapViewport::default(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeoprojError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeoprojError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(backend_url) = file_config.backend_url {
            self.backend_url.update(backend_url, ConfigSource::File);
        }
        if let Some(project_path) = file_config.project_path {
            self.project_path.update(project_path, ConfigSource::File);
        }

        if let Some(datasets) = file_config.datasets {
            if let Some(boundary) = datasets.boundary {
                self.boundary_dataset.update(boundary, ConfigSource::File);
            }
            if let Some(climate) = datasets.climate {
                self.climate_dataset.update(climate, ConfigSource::File);
            }
            if let Some(ecological) = datasets.ecological {
                self.ecological_dataset.update(ecological, ConfigSource::File);
            }
            if let Some(keys) = datasets.climate_keys.filter(|k| !k.is_empty()) {
                self.climate_keys.update(keys, ConfigSource::File);
            }
            if let Some(keys) = datasets.ecological_keys.filter(|k| !k.is_empty()) {
                self.ecological_keys.update(keys, ConfigSource::File);
            }
        }

        if let Some(geometry_validity) = file_config.geometry_validity {
            self.geometry_validity.update(geometry_validity, ConfigSource::File);
        }
        if let Some(owner) = file_config.owner {
            self.owner.update(owner, ConfigSource::File);
        }
        if let Some(project_code) = file_config.project_code {
            self.project_code.update(project_code, ConfigSource::File);
        }
        if let Some(timeout) = file_config.submit_timeout_secs {
            self.submit_timeout_secs.update(Some(timeout), ConfigSource::File);
        }
        if let Some(region) = file_config.region {
            self.region.update(region, ConfigSource::File);
        }
        if let Some(viewport) = file_config.viewport {
            self.viewport.update(viewport, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(url) = env::var("GEOPROJ_BACKEND_URL") {
            self.backend_url.update(url, ConfigSource::Environment);
        }

        if let Ok(path) = env::var("GEOPROJ_PROJECT_PATH") {
            self.project_path.update(path, ConfigSource::Environment);
        }

        if let Ok(path) = env::var("GEOPROJ_BOUNDARY_DATASET") {
            self.boundary_dataset.update(path, ConfigSource::Environment);
        }

        if let Ok(path) = env::var("GEOPROJ_CLIMATE_DATASET") {
            self.climate_dataset.update(path, ConfigSource::Environment);
        }

        if let Ok(path) = env::var("GEOPROJ_ECOLOGICAL_DATASET") {
            self.ecological_dataset.update(path, ConfigSource::Environment);
        }

        // GEOPROJ_CLIMATE_KEYS / GEOPROJ_ECOLOGICAL_KEYS are comma separated
        if let Ok(raw) = env::var("GEOPROJ_CLIMATE_KEYS") {
            match parse_key_list(&raw) {
                Ok(keys) => self.climate_keys.update(keys, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOPROJ_CLIMATE_KEYS value '{}': expected comma-separated keys",
                    raw
                ),
            }
        }

        if let Ok(raw) = env::var("GEOPROJ_ECOLOGICAL_KEYS") {
            match parse_key_list(&raw) {
                Ok(keys) => self.ecological_keys.update(keys, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOPROJ_ECOLOGICAL_KEYS value '{}': expected comma-separated keys",
                    raw
                ),
            }
        }

        if let Ok(validity_str) = env::var("GEOPROJ_GEOMETRY_VALIDITY") {
            match parse_validity_mode(&validity_str) {
                Ok(validity) => self.geometry_validity.update(validity, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOPROJ_GEOMETRY_VALIDITY value '{}': expected strict or lenient",
                    validity_str
                ),
            }
        }

        if let Ok(owner) = env::var("GEOPROJ_OWNER") {
            self.owner.update(owner, ConfigSource::Environment);
        }

        if let Ok(code_str) = env::var("GEOPROJ_PROJECT_CODE") {
            match code_str.parse::<u64>() {
                Ok(code) => self.project_code.update(code, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOPROJ_PROJECT_CODE value '{}': expected a positive integer",
                    code_str
                ),
            }
        }

        if let Ok(timeout_str) = env::var("GEOPROJ_SUBMIT_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    self.submit_timeout_secs.update(Some(secs), ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid GEOPROJ_SUBMIT_TIMEOUT_SECS value '{}': expected seconds > 0",
                    timeout_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(url) = overrides.backend_url {
            self.backend_url.update(url, ConfigSource::Cli);
        }

        if let Some(path) = overrides.boundary_dataset {
            self.boundary_dataset.update(path, ConfigSource::Cli);
        }

        if let Some(path) = overrides.climate_dataset {
            self.climate_dataset.update(path, ConfigSource::Cli);
        }

        if let Some(path) = overrides.ecological_dataset {
            self.ecological_dataset.update(path, ConfigSource::Cli);
        }

        if let Some(geometry_validity) = overrides.geometry_validity {
            self.geometry_validity.update(geometry_validity, ConfigSource::Cli);
        }

        if let Some(owner) = overrides.owner {
            self.owner.update(owner, ConfigSource::Cli);
        }

        if let Some(code) = overrides.project_code {
            self.project_code.update(code, ConfigSource::Cli);
        }

        if let Some(secs) = overrides.submit_timeout_secs {
            self.submit_timeout_secs.update(Some(secs), ConfigSource::Cli);
        }
    }

    /// Full registration endpoint URL
    pub fn project_url(&self) -> String {
        let base = self.backend_url.value.trim_end_matches('/');
        let path = self.project_path.value.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Locator for one of the three datasets
    pub fn dataset_locator(&self, kind: DatasetKind) -> ResourceLocator {
        let raw = match kind {
            DatasetKind::Boundary => &self.boundary_dataset.value,
            DatasetKind::ClimateZone => &self.climate_dataset.value,
            DatasetKind::EcologicalZone => &self.ecological_dataset.value,
        };
        ResourceLocator::parse(raw)
    }

    /// Attribute key chains for zone naming
    pub fn attribute_keys(&self) -> ZoneAttributeKeys {
        ZoneAttributeKeys {
            climate: self.climate_keys.value.clone(),
            ecological: self.ecological_keys.value.clone(),
        }
    }

    /// Optional bound on a single submission request
    pub fn submit_timeout(&self) -> Option<Duration> {
        self.submit_timeout_secs.value.map(Duration::from_secs)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> BTreeMap<String, (String, ConfigSource)> {
        let mut map = BTreeMap::new();

        map.insert(
            "backend_url".to_string(),
            (self.backend_url.value.clone(), self.backend_url.source),
        );
        map.insert(
            "project_path".to_string(),
            (self.project_path.value.clone(), self.project_path.source),
        );
        map.insert(
            "boundary_dataset".to_string(),
            (self.boundary_dataset.value.clone(), self.boundary_dataset.source),
        );
        map.insert(
            "climate_dataset".to_string(),
            (self.climate_dataset.value.clone(), self.climate_dataset.source),
        );
        map.insert(
            "ecological_dataset".to_string(),
            (self.ecological_dataset.value.clone(), self.ecological_dataset.source),
        );
        map.insert(
            "climate_keys".to_string(),
            (self.climate_keys.value.join(","), self.climate_keys.source),
        );
        map.insert(
            "ecological_keys".to_string(),
            (self.ecological_keys.value.join(","), self.ecological_keys.source),
        );
        map.insert(
            "geometry_validity".to_string(),
            (format!("{:?}", self.geometry_validity.value), self.geometry_validity.source),
        );
        map.insert("owner".to_string(), (self.owner.value.clone(), self.owner.source));
        map.insert(
            "project_code".to_string(),
            (self.project_code.value.to_string(), self.project_code.source),
        );
        map.insert(
            "submit_timeout_secs".to_string(),
            (
                self.submit_timeout_secs
                    .value
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "none".to_string()),
                self.submit_timeout_secs.source,
            ),
        );
        map.insert(
            "country_region".to_string(),
            (self.region.value.country_region.clone(), self.region.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    backend_url: Option<String>,
    project_path: Option<String>,
    geometry_validity: Option<ValidityMode>,
    owner: Option<String>,
    project_code: Option<u64>,
    submit_timeout_secs: Option<u64>,
    datasets: Option<DatasetFileConfig>,
    region: Option<RegionConfig>,
    viewport: Option<MapViewport>,
}

/// `[datasets]` table
#[derive(Debug, Deserialize, Serialize)]
struct DatasetFileConfig {
    boundary: Option<String>,
    climate: Option<String>,
    ecological: Option<String>,
    climate_keys: Option<Vec<String>>,
    ecological_keys: Option<Vec<String>>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub backend_url: Option<String>,
    pub boundary_dataset: Option<String>,
    pub climate_dataset: Option<String>,
    pub ecological_dataset: Option<String>,
    pub geometry_validity: Option<ValidityMode>,
    pub owner: Option<String>,
    pub project_code: Option<u64>,
    pub submit_timeout_secs: Option<u64>,
}

/// Parse validity mode from string
pub fn parse_validity_mode(s: &str) -> Result<ValidityMode> {
    match s.to_lowercase().as_str() {
        "strict" => Ok(ValidityMode::Strict),
        "lenient" => Ok(ValidityMode::Lenient),
        _ => Err(GeoprojError::ConfigInvalid {
            key: "geometry_validity".to_string(),
            reason: format!("Invalid validity mode: {}. Use strict or lenient", s),
        }),
    }
}

/// Parse a comma-separated attribute key list
pub fn parse_key_list(s: &str) -> Result<Vec<String>> {
    let keys: Vec<String> = s
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();

    if keys.is_empty() {
        return Err(GeoprojError::ConfigInvalid {
            key: "attribute_keys".to_string(),
            reason: "At least one attribute key is required".to_string(),
        });
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.backend_url.value, "http://localhost:8888");
        assert_eq!(config.backend_url.source, ConfigSource::Default);
        assert_eq!(config.geometry_validity.value, ValidityMode::Lenient);
        assert_eq!(config.climate_keys.value[0], "CLASS_NAME");
        assert_eq!(config.submit_timeout(), None);
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
backend_url = "https://api.example.org"
geometry_validity = "Strict"
owner = "Maria"
submit_timeout_secs = 30

[datasets]
boundary = "https://tiles.example.org/parana.geojson"
climate_keys = ["IPCC"]

[region]
country_region = "Brasil - Santa Catarina"
location_label = "Brazil"
state_label = "Santa Catarina"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.backend_url.value, "https://api.example.org");
        assert_eq!(config.backend_url.source, ConfigSource::File);
        assert_eq!(config.geometry_validity.value, ValidityMode::Strict);
        assert_eq!(config.owner.value, "Maria");
        assert_eq!(config.submit_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.dataset_locator(DatasetKind::Boundary),
            ResourceLocator::Url("https://tiles.example.org/parana.geojson".to_string())
        );
        assert_eq!(config.climate_keys.value, vec!["IPCC".to_string()]);
        assert_eq!(config.ecological_keys.source, ConfigSource::Default);
        assert_eq!(config.region.value.state_label, "Santa Catarina");
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            backend_url: Some("http://127.0.0.1:9000".to_string()),
            project_code: Some(777),
            ..Default::default()
        };

        config.update_from_cli(overrides);

        assert_eq!(config.backend_url.value, "http://127.0.0.1:9000");
        assert_eq!(config.backend_url.source, ConfigSource::Cli);
        assert_eq!(config.project_code.value, 777);
        assert_eq!(config.owner.source, ConfigSource::Default);
    }

    #[test]
    fn test_project_url_joins_cleanly() {
        let mut config = LayeredConfig::with_defaults();
        assert_eq!(config.project_url(), "http://localhost:8888/project");

        config.backend_url.update("http://host/api/".to_string(), ConfigSource::Cli);
        assert_eq!(config.project_url(), "http://host/api/project");
    }

    #[test]
    fn test_parse_key_list() {
        assert_eq!(
            parse_key_list(" gez_name , GEZ_TERM,,").unwrap(),
            vec!["gez_name".to_string(), "GEZ_TERM".to_string()]
        );
        assert!(parse_key_list(" , ").is_err());
    }

    #[test]
    fn test_parse_validity_mode() {
        assert_eq!(parse_validity_mode("strict").unwrap(), ValidityMode::Strict);
        assert_eq!(parse_validity_mode("LENIENT").unwrap(), ValidityMode::Lenient);
        assert!(parse_validity_mode("invalid").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        let (url, source) = &map["backend_url"];
        assert_eq!(url, "http://localhost:8888");
        assert_eq!(*source, ConfigSource::Default);

        let (timeout, _) = &map["submit_timeout_secs"];
        assert_eq!(timeout, "none");
        assert_eq!(map["country_region"].0, "Brasil - Paraná");
    }
}
