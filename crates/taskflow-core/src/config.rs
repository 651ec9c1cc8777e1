use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the persisted key-value documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Task storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the task collection is stored under
    #[serde(default = "default_tasks_key")]
    pub tasks_key: String,
}

fn default_tasks_key() -> String {
    "todos".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tasks_key: default_tasks_key(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Latitude used when no location service is available
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Longitude used when no location service is available
    #[serde(default)]
    pub longitude: Option<f64>,

    /// When false, location requests are treated as denied
    #[serde(default = "default_location_enabled")]
    pub location_enabled: bool,

    /// Base URL of the Open-Meteo forecast API
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,

    /// Base URL of the Nominatim reverse-geocoding API
    #[serde(default = "default_geocode_base_url")]
    pub geocode_base_url: String,

    /// Optional per-request timeout. Requests never time out when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_location_enabled() -> bool {
    true
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_geocode_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            location_enabled: default_location_enabled(),
            weather_base_url: default_weather_base_url(),
            geocode_base_url: default_geocode_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl WeatherConfig {
    /// Configured coordinates, if both halves are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Range-check a coordinate pair, reporting errors under
    /// `<field_prefix>latitude` and `<field_prefix>longitude`.
    pub fn validate_coordinates(
        latitude: f64,
        longitude: f64,
        field_prefix: &str,
        result: &mut ValidationResult,
    ) {
        if !(-90.0..=90.0).contains(&latitude) {
            result.add_error(
                format!("{}latitude", field_prefix),
                "Latitude must be within -90..=90",
            );
        }
        if !(-180.0..=180.0).contains(&longitude) {
            result.add_error(
                format!("{}longitude", field_prefix),
                "Longitude must be within -180..=180",
            );
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskflow")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage: StorageConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration from `path` (or the default location) and validate it
    ///
    /// Returns the config along with any validation warnings, which are
    /// also logged.
    ///
    /// # Errors
    /// Returns `ConfigError::ParseError` if the file can't be read or
    /// parsed, `ConfigError::Invalid` if validation finds errors.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult), ConfigError> {
        let loaded = match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        };
        let config = loaded.map_err(|e| ConfigError::ParseError(format!("{:#}", e)))?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.storage.tasks_key.trim().is_empty() {
            result.add_error("storage.tasks_key", "Storage key cannot be empty");
        }

        self.validate_url(
            &self.weather.weather_base_url,
            "weather.weather_base_url",
            &mut result,
        );
        self.validate_url(
            &self.weather.geocode_base_url,
            "weather.geocode_base_url",
            &mut result,
        );

        match (self.weather.latitude, self.weather.longitude) {
            (Some(lat), Some(lon)) => {
                WeatherConfig::validate_coordinates(lat, lon, "weather.", &mut result);
            }
            (None, None) => {
                result.add_warning(
                    "weather",
                    "No coordinates configured - the weather panel will report no location",
                );
            }
            _ => {
                result.add_error(
                    "weather",
                    "Set both weather.latitude and weather.longitude, or neither",
                );
            }
        }

        if self.weather.request_timeout_secs == Some(0) {
            result.add_error(
                "weather.request_timeout_secs",
                "Timeout must be greater than 0 (omit it to disable)",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("taskflow");

        Ok(config_dir.join("config.toml"))
    }
}
