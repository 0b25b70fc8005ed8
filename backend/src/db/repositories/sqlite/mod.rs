//! SQLite repository implementation using Diesel.
//!
//! Reads the `station` and `measurement` tables of the Hawaii climate
//! database. The schema is owned by the dataset and never migrated here, and
//! the file is always opened read-only: a wrong path fails at startup instead
//! of creating an empty database.
//!
//! ## Connection handling
//!
//! Connections come from an r2d2 pool. Every operation checks one out inside
//! `spawn_blocking` and returns it to the pool when the closure finishes, on
//! success and on error alike. No connection is shared between requests.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `SQLITE_DATABASE_URL`: Path or `file:` URI (required)
//! - `SQLITE_POOL_MAX`: Maximum pool size (default: 4)
//! - `SQLITE_CONN_TIMEOUT_SEC`: Connection checkout timeout in seconds (default: 30)

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::{avg, max, min};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    ErrorContext, HealthCheck, MeasurementRepository, RepositoryError, RepositoryResult,
    StationRepository, TemperatureAggregate,
};
use crate::models::{MeasurementFilter, PrecipitationRow, TemperatureRow};

mod models;
mod schema;

use models::{PrecipitationRecord, TemperatureRecord};
use schema::{measurement, station};

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

const STATION_TABLE: &str = "station";
const MEASUREMENT_TABLE: &str = "measurement";

/// Applies a [`MeasurementFilter`] to a boxed `measurement` query.
macro_rules! apply_measurement_filter {
    ($query:expr, $filter:expr) => {{
        let mut query = $query;
        if let Some(ref code) = $filter.station {
            query = query.filter(measurement::station.eq(code.clone()));
        }
        if let Some(start) = $filter.start {
            query = query.filter(measurement::date.ge(start));
        }
        if let Some(end) = $filter.end {
            query = query.filter(measurement::date.le(end));
        }
        query
    }};
}

/// Configuration for opening the SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database path or `file:` URI
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Connection checkout timeout in seconds
    pub connection_timeout_sec: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 4,
            connection_timeout_sec: 30,
        }
    }
}

fn env_number<T: std::str::FromStr>(key: &str, default: T) -> RepositoryResult<T> {
    match std::env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| {
            RepositoryError::configuration(format!("{} must be a number, got '{}'", key, value))
        }),
        Err(_) => Ok(default),
    }
}

impl SqliteConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> RepositoryResult<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("SQLITE_DATABASE_URL"))
            .map_err(|_| {
                RepositoryError::configuration("DATABASE_URL or SQLITE_DATABASE_URL must be set")
            })?;

        let config = Self {
            database_url,
            max_pool_size: env_number("SQLITE_POOL_MAX", 4)?,
            connection_timeout_sec: env_number("SQLITE_CONN_TIMEOUT_SEC", 30)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Reject settings r2d2 would panic on.
    pub fn validate(&self) -> RepositoryResult<()> {
        if self.database_url.trim().is_empty() {
            return Err(RepositoryError::configuration(
                "SQLite repository requires a database URL",
            ));
        }
        if self.max_pool_size == 0 {
            return Err(RepositoryError::configuration(
                "SQLite pool size must be at least 1",
            ));
        }
        if self.connection_timeout_sec == 0 {
            return Err(RepositoryError::configuration(
                "SQLite connection timeout must be at least 1 second",
            ));
        }
        Ok(())
    }

    /// The URI handed to SQLite, forced to `mode=ro`.
    ///
    /// Plain paths must name an existing file. `file:` URIs are passed
    /// through with the mode appended; SQLite itself refuses to open a
    /// missing file in read-only mode.
    pub fn read_only_uri(&self) -> RepositoryResult<String> {
        let url = self.database_url.trim();
        if let Some(rest) = url.strip_prefix("file:") {
            if rest.contains("mode=") {
                return Err(RepositoryError::configuration(
                    "database URL must not set its own mode; it is always opened read-only",
                ));
            }
            let sep = if rest.contains('?') { '&' } else { '?' };
            return Ok(format!("{}{}mode=ro", url, sep));
        }

        if !Path::new(url).is_file() {
            return Err(RepositoryError::configuration(format!(
                "SQLite database file not found: {}",
                url
            )));
        }
        let escaped = url
            .replace('%', "%25")
            .replace('?', "%3f")
            .replace('#', "%23");
        Ok(format!("file:{}?mode=ro", escaped))
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently checked out
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
}

/// Fail unless both tables exist with every column the schema reads.
///
/// `LIMIT 0` prepares the statements without reading any row.
fn verify_schema(conn: &mut SqliteConnection) -> QueryResult<()> {
    station::table
        .select((station::id, station::station_code))
        .limit(0)
        .load::<(i32, String)>(conn)?;
    measurement::table
        .select((
            measurement::id,
            measurement::station,
            measurement::date,
            measurement::prcp,
            measurement::tobs,
        ))
        .limit(0)
        .load::<(i32, String, NaiveDate, Option<f64>, f64)>(conn)?;
    Ok(())
}

/// Diesel-backed read-only repository for SQLite.
#[derive(Clone, Debug)]
pub struct SqliteRepository {
    pool: SqlitePool,
    config: SqliteConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
}

impl SqliteRepository {
    /// Open a read-only pool and check that the file holds the climate tables.
    ///
    /// Blocks while the pool establishes its connections.
    pub fn new(config: SqliteConfig) -> RepositoryResult<Self> {
        config.validate()?;
        let uri = config.read_only_uri()?;
        let open_context =
            || ErrorContext::new("open_database").with_details(config.database_url.clone());

        let manager = ConnectionManager::<SqliteConnection>::new(uri);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| RepositoryError::unavailable(e.to_string()).with_context(open_context()))?;

        let mut conn = pool
            .get()
            .map_err(|e| RepositoryError::from(e).with_context(open_context()))?;
        verify_schema(&mut conn).map_err(|e| {
            RepositoryError::configuration(format!("not a climate database: {}", e))
                .with_context(open_context())
        })?;
        drop(conn);

        log::info!(
            "Opened SQLite database {} read-only (max_size={})",
            config.database_url,
            config.max_pool_size
        );

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run `f` on a pooled connection off the async runtime.
    ///
    /// The connection goes back to the pool when the closure returns. A
    /// failure is tagged with `operation` and `table` and reported once;
    /// reads are not retried.
    async fn with_conn<T, F>(
        &self,
        operation: &'static str,
        table: &'static str,
        f: F,
    ) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> QueryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();

        task::spawn_blocking(move || {
            let result = pool.get().map_err(RepositoryError::from).and_then(|mut conn| {
                total_queries.fetch_add(1, Ordering::Relaxed);
                f(&mut conn).map_err(RepositoryError::from)
            });
            result.map_err(|e| {
                failed_queries.fetch_add(1, Ordering::Relaxed);
                let e = e.in_operation(operation, table);
                log::warn!("SQLite read failed: {}", e);
                e
            })
        })
        .await
        .map_err(|e| {
            RepositoryError::internal(format!("Task join error: {}", e))
                .in_operation(operation, table)
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl StationRepository for SqliteRepository {
    async fn fetch_station_ids(&self) -> RepositoryResult<Vec<String>> {
        self.with_conn("fetch_station_ids", STATION_TABLE, |conn| {
            station::table
                .select(station::station_code)
                .order(station::id.asc())
                .load::<String>(conn)
        })
        .await
    }
}

#[async_trait]
impl MeasurementRepository for SqliteRepository {
    async fn fetch_precipitation(
        &self,
        filter: &MeasurementFilter,
    ) -> RepositoryResult<Vec<PrecipitationRow>> {
        let filter = filter.clone();
        self.with_conn("fetch_precipitation", MEASUREMENT_TABLE, move |conn| {
            let query = apply_measurement_filter!(
                measurement::table
                    .select(PrecipitationRecord::as_select())
                    .into_boxed(),
                filter
            );
            let records = query
                .order(measurement::id.asc())
                .load::<PrecipitationRecord>(conn)?;
            Ok(records.into_iter().map(Into::into).collect())
        })
        .await
    }

    async fn fetch_temperature_observations(
        &self,
        filter: &MeasurementFilter,
    ) -> RepositoryResult<Vec<TemperatureRow>> {
        let filter = filter.clone();
        self.with_conn("fetch_temperature_observations", MEASUREMENT_TABLE, move |conn| {
            let query = apply_measurement_filter!(
                measurement::table
                    .select(TemperatureRecord::as_select())
                    .into_boxed(),
                filter
            );
            let records = query
                .order(measurement::id.asc())
                .load::<TemperatureRecord>(conn)?;
            Ok(records.into_iter().map(Into::into).collect())
        })
        .await
    }

    async fn aggregate_temperature(
        &self,
        filter: &MeasurementFilter,
    ) -> RepositoryResult<TemperatureAggregate> {
        let filter = filter.clone();
        self.with_conn("aggregate_temperature", MEASUREMENT_TABLE, move |conn| {
            let query = apply_measurement_filter!(
                measurement::table
                    .select((
                        min(measurement::tobs),
                        avg(measurement::tobs),
                        max(measurement::tobs),
                    ))
                    .into_boxed(),
                filter
            );
            let (min, avg, max) =
                query.get_result::<(Option<f64>, Option<f64>, Option<f64>)>(conn)?;
            Ok(TemperatureAggregate { min, avg, max })
        })
        .await
    }
}

#[async_trait]
impl HealthCheck for SqliteRepository {
    /// Checks the tables are still readable, not just that the file opens.
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", "station,measurement", |conn| {
            verify_schema(conn)?;
            Ok(true)
        })
        .await
    }
}
