use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::measurement;
use crate::models::{PrecipitationRow, TemperatureRow};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = measurement)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PrecipitationRecord {
    pub date: NaiveDate,
    pub prcp: Option<f64>,
}

impl From<PrecipitationRecord> for PrecipitationRow {
    fn from(record: PrecipitationRecord) -> Self {
        PrecipitationRow {
            date: record.date,
            precipitation: record.prcp,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = measurement)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TemperatureRecord {
    pub date: NaiveDate,
    pub tobs: f64,
}

impl From<TemperatureRecord> for TemperatureRow {
    fn from(record: TemperatureRecord) -> Self {
        TemperatureRow {
            date: record.date,
            temperature_observation: record.tobs,
        }
    }
}
