//! Repository traits for the climate store.
//!
//! The service depends only on [`ClimateRepository`]; backends implement the
//! narrower [`StationRepository`] and [`MeasurementRepository`] traits and
//! pick up the combined trait through the blanket impl below.

use async_trait::async_trait;

pub mod error;
pub mod measurement;
pub mod station;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use measurement::{MeasurementRepository, TemperatureAggregate};
pub use station::StationRepository;

/// Liveness probe implemented by every backend.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Returns `Ok(true)` when the store answers a trivial query.
    async fn health_check(&self) -> RepositoryResult<bool>;
}

/// Everything the Climate Query Service needs from a store.
pub trait ClimateRepository: StationRepository + MeasurementRepository + HealthCheck {}

impl<T> ClimateRepository for T where T: StationRepository + MeasurementRepository + HealthCheck {}
