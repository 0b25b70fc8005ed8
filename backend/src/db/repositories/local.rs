//! In-memory repository for tests and local development.
//!
//! Tables are immutable once the repository is built, so concurrent
//! requests read them without any locking. Row order is insertion order,
//! which plays the role of the store's natural order.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::db::repository::{
    ErrorContext, HealthCheck, MeasurementRepository, RepositoryError, RepositoryResult,
    StationRepository, TemperatureAggregate,
};
use crate::models::{Measurement, MeasurementFilter, PrecipitationRow, Station, TemperatureRow};

/// On-disk layout of a local seed file.
///
/// ```json
/// {
///   "stations": [{ "station": "USC00519397" }],
///   "measurements": [
///     { "station": "USC00519397", "date": "2010-01-01", "prcp": 0.08, "tobs": 65.0 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalDataset {
    #[serde(default)]
    pub stations: Vec<Station>,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

#[derive(Debug, Default)]
struct Tables {
    stations: Vec<Station>,
    measurements: Vec<Measurement>,
}

/// Read-only repository backed by in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct LocalRepository {
    tables: Arc<Tables>,
}

impl LocalRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding the given rows.
    pub fn with_data(stations: Vec<Station>, measurements: Vec<Measurement>) -> Self {
        Self {
            tables: Arc::new(Tables {
                stations,
                measurements,
            }),
        }
    }

    /// Load a repository from a JSON seed file (see [`LocalDataset`]).
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read seed file: {}", e))
                .with_context(seed_context(path))
        })?;

        let dataset: LocalDataset = serde_json::from_str(&content).map_err(|e| {
            RepositoryError::invalid_data(format!("Failed to parse seed file: {}", e))
                .with_context(seed_context(path))
        })?;

        log::info!(
            "Loaded local dataset from {}: {} stations, {} measurements",
            path.display(),
            dataset.stations.len(),
            dataset.measurements.len()
        );

        Ok(Self::from(dataset))
    }

    pub fn station_count(&self) -> usize {
        self.tables.stations.len()
    }

    pub fn measurement_count(&self) -> usize {
        self.tables.measurements.len()
    }

    fn matching<'a>(
        &'a self,
        filter: &'a MeasurementFilter,
    ) -> impl Iterator<Item = &'a Measurement> + 'a {
        self.tables
            .measurements
            .iter()
            .filter(move |m| filter.matches(m))
    }
}

fn seed_context(path: &Path) -> ErrorContext {
    ErrorContext::new("load_seed_file").with_details(path.display().to_string())
}

impl From<LocalDataset> for LocalRepository {
    fn from(dataset: LocalDataset) -> Self {
        Self::with_data(dataset.stations, dataset.measurements)
    }
}

#[async_trait]
impl StationRepository for LocalRepository {
    async fn fetch_station_ids(&self) -> RepositoryResult<Vec<String>> {
        Ok(self
            .tables
            .stations
            .iter()
            .map(|s| s.station.clone())
            .collect())
    }
}

#[async_trait]
impl MeasurementRepository for LocalRepository {
    async fn fetch_precipitation(
        &self,
        filter: &MeasurementFilter,
    ) -> RepositoryResult<Vec<PrecipitationRow>> {
        Ok(self
            .matching(filter)
            .map(|m| PrecipitationRow {
                date: m.date,
                precipitation: m.precipitation,
            })
            .collect())
    }

    async fn fetch_temperature_observations(
        &self,
        filter: &MeasurementFilter,
    ) -> RepositoryResult<Vec<TemperatureRow>> {
        Ok(self
            .matching(filter)
            .map(|m| TemperatureRow {
                date: m.date,
                temperature_observation: m.temperature_observation,
            })
            .collect())
    }

    async fn aggregate_temperature(
        &self,
        filter: &MeasurementFilter,
    ) -> RepositoryResult<TemperatureAggregate> {
        Ok(TemperatureAggregate::from_observations(
            self.matching(filter).map(|m| m.temperature_observation),
        ))
    }
}

#[async_trait]
impl HealthCheck for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
