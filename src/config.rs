//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! marine-config.toml file. It covers which NOAA zones to fetch and from
//! where, the cutover hour used to pick today's or tomorrow's periods, and
//! where the CSV goes.
//!
//! Configuration is read once at startup. A missing or broken file never
//! stops a run: the two South Florida zones are built in as defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "marine-config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config IO: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config format: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Application configuration loaded from marine-config.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Period selection settings
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// CSV destination
    #[serde(default)]
    pub output: OutputConfig,
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Zones to fetch, processed in this order
    #[serde(default = "default_zones")]
    pub zones: Vec<ZoneConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastConfig {
    /// Local hour (0-23) from which tomorrow's periods are reported instead of today's
    pub cutover_hour: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory created on demand
    pub dir: PathBuf,
    /// CSV file name inside `dir`
    pub file: String,
    /// Extra locations the finished CSV is copied to (e.g. a newsroom share)
    #[serde(default)]
    pub mirrors: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

/// One NOAA marine zone.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZoneConfig {
    /// Zone identifier as it appears in the product (e.g. `AMZ651`)
    pub id: String,
    /// Human-readable name for logs
    pub name: String,
    /// CWF product URL that contains this zone
    pub url: String,
    /// Other zone header spellings that cover this zone (e.g. `GMZ042>044`)
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { cutover_hour: 12 }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/output"),
            file: "marine_forecast.csv".to_string(),
            mirrors: Vec::new(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("marine-forecast/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

fn default_zones() -> Vec<ZoneConfig> {
    vec![
        ZoneConfig {
            id: "AMZ651".to_string(),
            name: "Miami".to_string(),
            url: "https://forecast.weather.gov/product.php?site=MFL&issuedby=MFL&product=CWF"
                .to_string(),
            aliases: Vec::new(),
        },
        ZoneConfig {
            id: "GMZ044".to_string(),
            name: "Keys".to_string(),
            url: "https://forecast.weather.gov/product.php?site=NWS&issuedby=KEY&product=CWF"
                .to_string(),
            // Key West groups its Hawk Channel zones in one header
            aliases: vec!["GMZ042>044".to_string(), "GMZ042-044".to_string()],
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            forecast: ForecastConfig::default(),
            output: OutputConfig::default(),
            http: HttpConfig::default(),
            zones: default_zones(),
        }
    }
}

impl OutputConfig {
    /// Full path of the primary CSV file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file)
    }
}

impl Config {
    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load_from_path(path) {
            Ok(config) => {
                info!(path = %path.display(), zones = config.zones.len(), "loaded configuration");
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file found, using default South Florida zones");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unusable config file, using defaults");
                Self::default()
            }
        }
    }

    /// Load and validate without falling back.
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.forecast.cutover_hour > 23 {
            return Err(ConfigError::Invalid(format!(
                "cutover_hour must be 0-23, got {}",
                self.forecast.cutover_hour
            )));
        }
        if self.zones.is_empty() {
            return Err(ConfigError::Invalid("no zones configured".to_string()));
        }
        if let Some(zone) = self.zones.iter().find(|z| z.id.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("zone '{}' has an empty id", zone.name)));
        }
        Ok(())
    }

    /// Find a configured zone by id (case-insensitive).
    pub fn zone(&self, id: &str) -> Option<&ZoneConfig> {
        self.zones.iter().find(|z| z.id.eq_ignore_ascii_case(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.forecast.cutover_hour, 12);
        assert_eq!(config.zones.len(), 2);
        assert_eq!(config.zones[0].id, "AMZ651");
        assert_eq!(config.zones[1].id, "GMZ044");
        assert_eq!(
            config.output.path(),
            PathBuf::from("data/output").join("marine_forecast.csv")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.zones[1].aliases, parsed.zones[1].aliases);
        assert_eq!(config.http.timeout_secs, parsed.http.timeout_secs);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[forecast]\ncutover_hour = 14").unwrap();

        let config = Config::try_load_from_path(file.path()).unwrap();
        assert_eq!(config.forecast.cutover_hour, 14);
        assert_eq!(config.zones.len(), 2);
        assert_eq!(config.output.file, "marine_forecast.csv");
    }

    #[test]
    fn test_invalid_cutover_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[forecast]\ncutover_hour = 24").unwrap();

        assert!(matches!(
            Config::try_load_from_path(file.path()),
            Err(ConfigError::Invalid(_))
        ));
        // The lenient loader falls back instead
        assert_eq!(Config::load_from_path(file.path()).forecast.cutover_hour, 12);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        assert_eq!(config.zones[0].id, "AMZ651");
    }

    #[test]
    fn test_zone_lookup() {
        let config = Config::default();
        assert_eq!(config.zone("gmz044").map(|z| z.name.as_str()), Some("Keys"));
        assert!(config.zone("AMZ999").is_none());
    }
}
