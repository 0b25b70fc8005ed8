//! Service configuration.
//!
//! The dataset is a fixed historical snapshot, so two of its facts are baked
//! in as named constants. Both were computed once, offline, against the full
//! `measurement` table and only change when the dataset is replaced:
//!
//! - [`LATEST_DATASET_DATE`]: `SELECT MAX(date) FROM measurement`
//! - [`MOST_ACTIVE_STATION`]: the station with the highest `COUNT(*)`
//!   when grouping `measurement` by station
//!
//! Either can be overridden from the `[dataset]` table of `climate.toml` or
//! from the environment without touching handler code:
//!
//! ```toml
//! [dataset]
//! latest_date = "2017-08-23"
//! most_active_station = "USC00519281"
//! lookback_days = 365
//! ```
//!
//! # Environment Variables
//! - `CLIMATE_CONFIG`: Path of the TOML file (default search: `climate.toml`,
//!   `backend/climate.toml`, `../climate.toml`)
//! - `CLIMATE_LATEST_DATE`, `CLIMATE_MOST_ACTIVE_STATION`, `CLIMATE_LOOKBACK_DAYS`
//! - `HOST` (default: 0.0.0.0), `PORT` (default: 5000)

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{cutoff_date, parse_api_date};

/// Most recent observation date in the dataset.
pub const LATEST_DATASET_DATE: &str = "2017-08-23";

/// Station with the most observations in the dataset.
pub const MOST_ACTIVE_STATION: &str = "USC00519281";

/// Length of the trailing window served by the precipitation and tobs routes.
pub const LOOKBACK_DAYS: i64 = 365;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "climate.toml";

/// Configuration errors reported at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }
}

fn default_latest_date() -> NaiveDate {
    parse_api_date(LATEST_DATASET_DATE).expect("LATEST_DATASET_DATE is a valid YYYY-MM-DD date")
}

/// Facts about the dataset the query routes depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Anchor date the trailing window ends at.
    pub latest_date: NaiveDate,
    /// Station whose observations the tobs route returns.
    pub most_active_station: String,
    /// Width of the trailing window, in days.
    pub lookback_days: i64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            latest_date: default_latest_date(),
            most_active_station: MOST_ACTIVE_STATION.to_string(),
            lookback_days: LOOKBACK_DAYS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    dataset: DatasetConfig,
}

impl DatasetConfig {
    /// First date included by the precipitation and tobs routes.
    ///
    /// A validated config always has a representable cutoff; a hand-built one
    /// whose window overflows saturates to the earliest date.
    pub fn cutoff(&self) -> NaiveDate {
        cutoff_date(self.latest_date, self.lookback_days).unwrap_or(NaiveDate::MIN)
    }

    /// Parse the `[dataset]` table from TOML text; missing keys keep defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: DatasetFile = toml::from_str(content)?;
        file.dataset.validate()
    }

    /// Load the `[dataset]` table from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve the configuration: file (explicit, `CLIMATE_CONFIG`, or the
    /// first default location that exists), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path.map(Path::to_path_buf).or_else(find_config_file) {
            Some(path) => {
                log::info!("Loading dataset configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        base.with_env_overrides()
    }

    /// Apply `CLIMATE_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(value) = env::var("CLIMATE_LATEST_DATE") {
            self.latest_date = parse_api_date(&value)
                .map_err(|e| ConfigError::invalid("CLIMATE_LATEST_DATE", e.to_string()))?;
        }
        if let Ok(value) = env::var("CLIMATE_MOST_ACTIVE_STATION") {
            self.most_active_station = value;
        }
        if let Ok(value) = env::var("CLIMATE_LOOKBACK_DAYS") {
            self.lookback_days = value.parse().map_err(|_| {
                ConfigError::invalid("CLIMATE_LOOKBACK_DAYS", format!("'{}' is not an integer", value))
            })?;
        }
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.most_active_station.trim().is_empty() {
            return Err(ConfigError::invalid(
                "most_active_station",
                "station code must not be empty",
            ));
        }
        if self.lookback_days < 0 {
            return Err(ConfigError::invalid(
                "lookback_days",
                "lookback window must not be negative",
            ));
        }
        if cutoff_date(self.latest_date, self.lookback_days).is_none() {
            return Err(ConfigError::invalid(
                "lookback_days",
                format!(
                    "{} days before {} is out of the supported date range",
                    self.lookback_days, self.latest_date
                ),
            ));
        }
        Ok(self)
    }
}

/// Bind address for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// Read `HOST` and `PORT`, falling back to defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::invalid("PORT", format!("'{}' is not a valid port", port)))?;
        }
        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::invalid("HOST", format!("{}", e)))
    }
}

/// Locations searched for the configuration file, in order.
pub fn default_config_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from(DEFAULT_CONFIG_FILE),
        PathBuf::from("backend").join(DEFAULT_CONFIG_FILE),
        PathBuf::from("..").join(DEFAULT_CONFIG_FILE),
    ]
}

/// `CLIMATE_CONFIG` if set, otherwise the first default path that exists.
pub fn find_config_file() -> Option<PathBuf> {
    if let Ok(path) = env::var("CLIMATE_CONFIG") {
        return Some(PathBuf::from(path));
    }
    default_config_paths().into_iter().find(|p| p.exists())
}
