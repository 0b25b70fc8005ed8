//! Rows of the `station` and `measurement` tables.
//!
//! The service never creates or mutates these; they are materialized from
//! the store per request and dropped once the response is built.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A weather station. Only the station code is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub station: String,
}

impl Station {
    pub fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
        }
    }
}

/// One daily observation from one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Station code (foreign key into `station`).
    pub station: String,
    pub date: NaiveDate,
    /// Precipitation in inches; missing on some days.
    #[serde(rename = "prcp")]
    pub precipitation: Option<f64>,
    /// Observed temperature in degrees Fahrenheit.
    #[serde(rename = "tobs")]
    pub temperature_observation: f64,
}

impl Measurement {
    pub fn new(
        station: impl Into<String>,
        date: NaiveDate,
        precipitation: Option<f64>,
        temperature_observation: f64,
    ) -> Self {
        Self {
            station: station.into(),
            date,
            precipitation,
            temperature_observation,
        }
    }
}

/// `(date, prcp)` projection of a measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecipitationRow {
    pub date: NaiveDate,
    pub precipitation: Option<f64>,
}

/// `(date, tobs)` projection of a measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRow {
    pub date: NaiveDate,
    pub temperature_observation: f64,
}

/// Conjunction of predicates applied to the measurement table.
///
/// Date bounds are inclusive. An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementFilter {
    pub station: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl MeasurementFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep rows with `date >= start`.
    pub fn since(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Keep rows with `date <= end`.
    pub fn until(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Keep rows reported by `station`.
    pub fn for_station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub fn matches(&self, measurement: &Measurement) -> bool {
        if let Some(ref station) = self.station {
            if measurement.station != *station {
                return false;
            }
        }
        if let Some(start) = self.start {
            if measurement.date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if measurement.date > end {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Measurement {
        Measurement::new("USC00519281", date(2017, 8, 10), Some(0.1), 80.0)
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(MeasurementFilter::new().matches(&sample()));
    }

    #[test]
    fn test_since_is_inclusive() {
        assert!(MeasurementFilter::new().since(date(2017, 8, 10)).matches(&sample()));
        assert!(!MeasurementFilter::new().since(date(2017, 8, 11)).matches(&sample()));
    }

    #[test]
    fn test_until_is_inclusive() {
        assert!(MeasurementFilter::new().until(date(2017, 8, 10)).matches(&sample()));
        assert!(!MeasurementFilter::new().until(date(2017, 8, 9)).matches(&sample()));
    }

    #[test]
    fn test_station_predicate() {
        assert!(MeasurementFilter::new()
            .for_station("USC00519281")
            .matches(&sample()));
        assert!(!MeasurementFilter::new()
            .for_station("USC00519397")
            .matches(&sample()));
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let filter = MeasurementFilter::new()
            .since(date(2017, 8, 15))
            .until(date(2017, 8, 5));
        assert!(!filter.matches(&sample()));
    }

    #[test]
    fn test_measurement_seed_field_names() {
        let json = r#"{"station":"USC00519397","date":"2010-01-01","prcp":null,"tobs":65.0}"#;
        let m: Measurement = serde_json::from_str(json).unwrap();
        assert_eq!(m.station, "USC00519397");
        assert_eq!(m.date, date(2010, 1, 1));
        assert_eq!(m.precipitation, None);
        assert_eq!(m.temperature_observation, 65.0);
    }
}
