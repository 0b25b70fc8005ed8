//! Climate Query Service.
//!
//! One function per route. Each derives its query parameters, issues a
//! single read against the repository and reshapes the result; nothing is
//! cached or shared between calls.

use crate::api::{DatedObservation, PrecipitationSummary, TemperatureStats};
use crate::config::DatasetConfig;
use crate::db::repository::{ClimateRepository, RepositoryError};
use crate::models::{parse_api_date, DateParseError, MeasurementFilter};

use super::reshape::{dated_observations, precipitation_by_date};

/// Plain-text body of `GET /`.
pub const WELCOME_MESSAGE: &str = "Welcome to the Climate API!\n\
Available Routes:\n\
/api/v1.0/precipitation\n\
/api/v1.0/stations\n\
/api/v1.0/tobs\n\
/api/v1.0/<start>\n\
/api/v1.0/<start>/<end>\n";

/// Failures surfaced by the query operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A user-supplied date did not parse; the caller's fault.
    #[error(transparent)]
    InvalidDate(#[from] DateParseError),

    /// The store could not answer the query.
    #[error("store query failed: {0}")]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Static listing of the available routes.
pub fn welcome() -> &'static str {
    WELCOME_MESSAGE
}

/// Precipitation for every measurement in the trailing window, keyed by date.
pub async fn precipitation_summary(
    repo: &dyn ClimateRepository,
    dataset: &DatasetConfig,
) -> ServiceResult<PrecipitationSummary> {
    let filter = MeasurementFilter::new().since(dataset.cutoff());
    let rows = repo.fetch_precipitation(&filter).await?;
    log::debug!("precipitation: {} rows since {}", rows.len(), dataset.cutoff());
    Ok(precipitation_by_date(rows))
}

/// Every station code, in store order.
pub async fn list_stations(repo: &dyn ClimateRepository) -> ServiceResult<Vec<String>> {
    Ok(repo.fetch_station_ids().await?)
}

/// Temperature observations of the most active station over the trailing window.
pub async fn most_active_station_tobs(
    repo: &dyn ClimateRepository,
    dataset: &DatasetConfig,
) -> ServiceResult<Vec<DatedObservation>> {
    let filter = MeasurementFilter::new()
        .for_station(dataset.most_active_station.as_str())
        .since(dataset.cutoff());
    let rows = repo.fetch_temperature_observations(&filter).await?;
    Ok(dated_observations(rows))
}

/// TMIN/TAVG/TMAX over every measurement dated on or after `start`.
pub async fn temperature_stats_from(
    repo: &dyn ClimateRepository,
    start: &str,
) -> ServiceResult<TemperatureStats> {
    let start = parse_api_date(start)?;
    let filter = MeasurementFilter::new().since(start);
    Ok(repo.aggregate_temperature(&filter).await?.into())
}

/// TMIN/TAVG/TMAX over measurements dated from `start` through `end`.
///
/// `start > end` is not rejected; it simply matches nothing and yields nulls.
pub async fn temperature_stats_between(
    repo: &dyn ClimateRepository,
    start: &str,
    end: &str,
) -> ServiceResult<TemperatureStats> {
    let start = parse_api_date(start)?;
    let end = parse_api_date(end)?;
    let filter = MeasurementFilter::new().since(start).until(end);
    Ok(repo.aggregate_temperature(&filter).await?.into())
}
