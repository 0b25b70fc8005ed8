//! Response bodies of the HTTP API.
//!
//! Shapes here are part of the public contract and must stay stable:
//! clients depend on the exact JSON layout of every route.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::db::repository::TemperatureAggregate;
use crate::models::format_api_date;

/// `GET /api/v1.0/precipitation`: date string → precipitation (or `null`).
///
/// Keys are ordered so the encoded body is identical across requests.
pub type PrecipitationSummary = BTreeMap<String, Option<f64>>;

/// One element of `GET /api/v1.0/tobs`, encoded as `{"<date>": <tobs>}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedObservation {
    pub date: NaiveDate,
    pub temperature_observation: f64,
}

impl Serialize for DatedObservation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&format_api_date(self.date), &self.temperature_observation)?;
        map.end()
    }
}

/// `GET /api/v1.0/{start}[/{end}]`: temperature aggregate.
///
/// Every field is `null` when no measurement matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureStats {
    #[serde(rename = "TMIN")]
    pub tmin: Option<f64>,
    #[serde(rename = "TAVG")]
    pub tavg: Option<f64>,
    #[serde(rename = "TMAX")]
    pub tmax: Option<f64>,
}

impl From<TemperatureAggregate> for TemperatureStats {
    fn from(agg: TemperatureAggregate) -> Self {
        Self {
            tmin: agg.min,
            tavg: agg.avg,
            tmax: agg.max,
        }
    }
}

/// `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}
