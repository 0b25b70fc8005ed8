//! Repository factory for dependency injection.
//!
//! Picks a backend from runtime configuration and hands it out as a shared
//! `Arc<dyn ClimateRepository>`.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "sqlite-repo")]
use super::repositories::SqliteRepository;
use super::repository::{ClimateRepository, RepositoryError, RepositoryResult};
use super::SqliteConfig;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// SQLite + Diesel implementation
    Sqlite,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("sqlite", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`; an unrecognised value is a configuration
    /// error. When unset, defaults to SQLite if a database URL is present,
    /// otherwise Local.
    pub fn from_env() -> RepositoryResult<Self> {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().map_err(|e| {
                RepositoryError::configuration(format!("REPOSITORY_TYPE: {}", e))
            });
        }

        if std::env::var("DATABASE_URL").is_ok() || std::env::var("SQLITE_DATABASE_URL").is_ok()
        {
            Ok(Self::Sqlite)
        } else {
            Ok(Self::Local)
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use climate_api::db::{RepositoryFactory, RepositoryType, SqliteConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Requires the `sqlite-repo` feature.
///     let config = SqliteConfig::with_url("Resources/hawaii.sqlite");
///     let repo = RepositoryFactory::create(RepositoryType::Sqlite, Some(&config)).await?;
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `sqlite_config` - Optional database configuration (required for SQLite)
    pub async fn create(
        repo_type: RepositoryType,
        sqlite_config: Option<&SqliteConfig>,
    ) -> RepositoryResult<Arc<dyn ClimateRepository>> {
        match repo_type {
            RepositoryType::Sqlite => {
                #[cfg(feature = "sqlite-repo")]
                {
                    let config = sqlite_config.ok_or_else(|| {
                        RepositoryError::configuration(
                            "SQLite repository requires SqliteConfig",
                        )
                    })?;
                    let repo = Self::create_sqlite(config).await?;
                    Ok(repo as Arc<dyn ClimateRepository>)
                }
                #[cfg(not(feature = "sqlite-repo"))]
                {
                    let _ = sqlite_config;
                    Err(RepositoryError::configuration(
                        "SQLite repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a SQLite repository.
    #[cfg(feature = "sqlite-repo")]
    pub async fn create_sqlite(config: &SqliteConfig) -> RepositoryResult<Arc<SqliteRepository>> {
        let config = config.clone();
        let repo = tokio::task::spawn_blocking(move || SqliteRepository::new(config))
            .await
            .map_err(|e| RepositoryError::internal(format!("Task join error: {}", e)))??;
        Ok(Arc::new(repo))
    }

    /// Create an empty in-memory local repository.
    pub fn create_local() -> Arc<dyn ClimateRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create an in-memory repository loaded from a JSON seed file.
    pub fn create_local_from_seed<P: AsRef<Path>>(
        seed_path: P,
    ) -> RepositoryResult<Arc<dyn ClimateRepository>> {
        Ok(Arc::new(LocalRepository::from_seed_file(seed_path)?))
    }

    /// Create repository from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE` to pick the backend. A local repository is
    /// seeded from `LOCAL_SEED_PATH` when that variable is set.
    pub async fn from_env() -> RepositoryResult<Arc<dyn ClimateRepository>> {
        match RepositoryType::from_env()? {
            RepositoryType::Sqlite => {
                #[cfg(feature = "sqlite-repo")]
                {
                    let config = SqliteConfig::from_env()?;
                    let repo = Self::create_sqlite(&config).await?;
                    Ok(repo as Arc<dyn ClimateRepository>)
                }
                #[cfg(not(feature = "sqlite-repo"))]
                {
                    Err(RepositoryError::configuration(
                        "SQLite repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Local => {
                let seed = std::env::var("LOCAL_SEED_PATH").ok().map(PathBuf::from);
                Self::local_with_optional_seed(seed.as_deref())
            }
        }
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn ClimateRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config).await
    }

    /// Create repository from the default configuration file location.
    pub async fn from_default_config() -> RepositoryResult<Arc<dyn ClimateRepository>> {
        let config = RepositoryConfig::from_default_location()?;
        Self::from_repository_config(&config).await
    }

    /// Create repository from a RepositoryConfig instance.
    pub async fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn ClimateRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        match repo_type {
            RepositoryType::Sqlite => {
                let sqlite_config = config.to_sqlite_config()?;
                Self::create(RepositoryType::Sqlite, sqlite_config.as_ref()).await
            }
            RepositoryType::Local => {
                Self::local_with_optional_seed(config.local.seed_path.as_deref())
            }
        }
    }

    fn local_with_optional_seed(
        seed_path: Option<&Path>,
    ) -> RepositoryResult<Arc<dyn ClimateRepository>> {
        match seed_path {
            Some(path) => Self::create_local_from_seed(path),
            None => {
                log::warn!("No seed file configured; serving an empty local repository");
                Ok(Self::create_local())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_from_str() {
        assert_eq!(
            RepositoryType::from_str("local").unwrap(),
            RepositoryType::Local
        );
        assert_eq!(
            RepositoryType::from_str("SQLite").unwrap(),
            RepositoryType::Sqlite
        );
        assert_eq!(
            RepositoryType::from_str("sqlite3").unwrap(),
            RepositoryType::Sqlite
        );
        assert!(RepositoryType::from_str("postgres").is_err());
    }

    #[tokio::test]
    async fn test_create_local_repository() {
        let repo = RepositoryFactory::create_local();
        assert!(repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_create_sqlite_without_config_fails() {
        let result = RepositoryFactory::create(RepositoryType::Sqlite, None).await;
        assert!(matches!(
            result,
            Err(RepositoryError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_seed_file_is_configuration_error() {
        let result = RepositoryFactory::create_local_from_seed("/nonexistent/seed.json");
        assert!(matches!(
            result,
            Err(RepositoryError::Configuration { .. })
        ));
    }
}
