//! Repository trait for filtered reads over the `measurement` table.
//!
//! Each method is a single query: a projection or a group-free aggregate
//! over the rows accepted by a [`MeasurementFilter`].

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{MeasurementFilter, PrecipitationRow, TemperatureRow};

/// MIN/AVG/MAX of `tobs` over a filtered set.
///
/// All fields are `None` when no row matched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TemperatureAggregate {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl TemperatureAggregate {
    /// Aggregate a sequence of observations in one pass.
    pub fn from_observations(observations: impl IntoIterator<Item = f64>) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in observations {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            min: Some(min),
            avg: Some(sum / count as f64),
            max: Some(max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.avg.is_none() && self.max.is_none()
    }
}

/// Repository trait for measurement queries.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Project `(date, prcp)` for every matching row, in store order.
    ///
    /// # Arguments
    /// * `filter` - Predicates every returned row satisfies
    async fn fetch_precipitation(
        &self,
        filter: &MeasurementFilter,
    ) -> RepositoryResult<Vec<PrecipitationRow>>;

    /// Project `(date, tobs)` for every matching row, in store order.
    ///
    /// # Arguments
    /// * `filter` - Predicates every returned row satisfies
    async fn fetch_temperature_observations(
        &self,
        filter: &MeasurementFilter,
    ) -> RepositoryResult<Vec<TemperatureRow>>;

    /// Compute MIN, AVG and MAX of `tobs` across matching rows.
    ///
    /// # Returns
    /// * `Ok(TemperatureAggregate)` - Empty (all `None`) when nothing matched
    /// * `Err(RepositoryError)` - If the store cannot be queried
    async fn aggregate_temperature(
        &self,
        filter: &MeasurementFilter,
    ) -> RepositoryResult<TemperatureAggregate>;
}

#[cfg(test)]
mod tests {
    use super::TemperatureAggregate;

    #[test]
    fn test_aggregate_empty() {
        let agg = TemperatureAggregate::from_observations(Vec::<f64>::new());
        assert!(agg.is_empty());
    }

    #[test]
    fn test_aggregate_values() {
        let agg = TemperatureAggregate::from_observations([80.0, 75.0]);
        assert_eq!(agg.min, Some(75.0));
        assert_eq!(agg.avg, Some(77.5));
        assert_eq!(agg.max, Some(80.0));
    }

    #[test]
    fn test_aggregate_single_value() {
        let agg = TemperatureAggregate::from_observations([80.0]);
        assert_eq!(agg.min, Some(80.0));
        assert_eq!(agg.avg, Some(80.0));
        assert_eq!(agg.max, Some(80.0));
    }
}
