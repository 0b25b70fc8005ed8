//! Repository configuration file support.
//!
//! Reads the `[repository]`, `[sqlite]` and `[local]` tables of a TOML file.
//! Other tables (such as `[dataset]`) are ignored here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
use crate::db::SqliteConfig;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub sqlite: SqliteSettings,
    #[serde(default)]
    pub local: LocalSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: "local".to_string(),
        }
    }
}

/// SQLite connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for SqliteSettings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

/// In-memory repository settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalSettings {
    /// Optional JSON seed file; an empty repository is used when absent.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

fn default_max_connections() -> u32 {
    4
}

fn default_connect_timeout() -> u64 {
    30
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse repository configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `climate.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        for path in crate::config::default_config_paths() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No climate.toml found in standard locations",
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Convert to SqliteConfig if this is a SQLite configuration.
    #[cfg(feature = "sqlite-repo")]
    pub fn to_sqlite_config(&self) -> Result<Option<SqliteConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Sqlite {
            return Ok(None);
        }

        if self.sqlite.database_url.is_empty() {
            return Err(RepositoryError::configuration(
                "SQLite repository requires 'sqlite.database_url' setting",
            ));
        }

        let config = SqliteConfig {
            database_url: self.sqlite.database_url.clone(),
            max_pool_size: self.sqlite.max_connections,
            connection_timeout_sec: self.sqlite.connect_timeout,
        };
        config.validate()?;
        Ok(Some(config))
    }

    /// Convert to SqliteConfig when the feature is disabled.
    #[cfg(not(feature = "sqlite-repo"))]
    pub fn to_sqlite_config(&self) -> Result<Option<SqliteConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type == RepositoryType::Sqlite {
            return Err(RepositoryError::configuration(
                "SQLite repository feature not enabled",
            ));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[repository]
type = "local"

[local]
seed_path = "data/hawaii.json"
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(
            config.local.seed_path.as_deref(),
            Some(Path::new("data/hawaii.json"))
        );
        assert!(config.to_sqlite_config().unwrap().is_none());
    }

    #[test]
    fn test_unknown_tables_are_ignored() {
        let toml = r#"
[repository]
type = "local"

[dataset]
latest_date = "2017-08-23"
"#;

        assert!(RepositoryConfig::from_toml_str(toml).is_ok());
    }

    #[test]
    fn test_missing_repository_table_defaults_to_local() {
        let config = RepositoryConfig::from_toml_str("[dataset]\nlookback_days = 30\n").unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert!(config.local.seed_path.is_none());
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let err = RepositoryConfig::from_toml_str("[repository\ntype = local").unwrap_err();
        assert!(matches!(err, RepositoryError::Configuration { .. }));
    }

    #[cfg(feature = "sqlite-repo")]
    #[test]
    fn test_parse_sqlite_config() {
        let toml = r#"
[repository]
type = "sqlite"

[sqlite]
database_url = "Resources/hawaii.sqlite"
max_connections = 8
connect_timeout = 5
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        let sqlite = config.to_sqlite_config().unwrap().unwrap();
        assert_eq!(sqlite.database_url, "Resources/hawaii.sqlite");
        assert_eq!(sqlite.max_pool_size, 8);
        assert_eq!(sqlite.connection_timeout_sec, 5);
    }

    #[cfg(feature = "sqlite-repo")]
    #[test]
    fn test_sqlite_requires_database_url() {
        let toml = r#"
[repository]
type = "sqlite"
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert!(config.to_sqlite_config().is_err());
    }

    #[cfg(feature = "sqlite-repo")]
    #[test]
    fn test_sqlite_zero_max_connections_rejected() {
        let toml = r#"
[repository]
type = "sqlite"

[sqlite]
database_url = "Resources/hawaii.sqlite"
max_connections = 0
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        let err = config.to_sqlite_config().unwrap_err();
        assert!(matches!(err, RepositoryError::Configuration { .. }));
    }

    #[cfg(not(feature = "sqlite-repo"))]
    #[test]
    fn test_sqlite_without_feature_is_error() {
        let toml = r#"
[repository]
type = "sqlite"

[sqlite]
database_url = "Resources/hawaii.sqlite"
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert!(config.to_sqlite_config().is_err());
    }
}
