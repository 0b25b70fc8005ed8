//! Store layer for the climate dataset.
//!
//! The service reads through the [`ClimateRepository`] trait so the backing
//! store can be swapped without touching handler logic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers (http/)                                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Climate Query Service (services/)                      │
//! │  - date parsing, cutoff computation, reshaping          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository traits (repository/)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼────────────────────┐
//!     │  LocalRepository  SqliteRepository │
//!     │   (in-memory)     (diesel + r2d2)  │
//!     └────────────────────────────────────┘
//! ```

#[cfg(not(any(feature = "sqlite-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

#[cfg(feature = "sqlite-repo")]
pub use repositories::{PoolStats, SqliteConfig, SqliteRepository};
#[cfg(not(feature = "sqlite-repo"))]
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    _private: (),
}

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::{LocalDataset, LocalRepository};
pub use repository::{
    ClimateRepository, ErrorContext, HealthCheck, MeasurementRepository, RepositoryError,
    RepositoryResult, StationRepository, TemperatureAggregate,
};
