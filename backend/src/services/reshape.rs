//! Turn store rows into the JSON shapes the routes return.

use crate::api::{DatedObservation, PrecipitationSummary};
use crate::models::{format_api_date, PrecipitationRow, TemperatureRow};

/// Collapse `(date, prcp)` rows into a date-keyed map.
///
/// Several stations report on the same day, so dates repeat. The row seen
/// last (in store order) wins for each date; earlier values are dropped.
// TODO: decide with API consumers whether colliding dates should be
// averaged or listed instead of keeping only the last station's value.
pub fn precipitation_by_date<I>(rows: I) -> PrecipitationSummary
where
    I: IntoIterator<Item = PrecipitationRow>,
{
    let mut summary = PrecipitationSummary::new();
    let mut collisions = 0usize;
    for row in rows {
        if summary
            .insert(format_api_date(row.date), row.precipitation)
            .is_some()
        {
            collisions += 1;
        }
    }
    if collisions > 0 {
        log::debug!(
            "precipitation summary: {} rows overwrote an earlier value for the same date",
            collisions
        );
    }
    summary
}

/// Keep `(date, tobs)` rows as a list of single-entry objects, in store order.
pub fn dated_observations<I>(rows: I) -> Vec<DatedObservation>
where
    I: IntoIterator<Item = TemperatureRow>,
{
    rows.into_iter()
        .map(|row| DatedObservation {
            date: row.date,
            temperature_observation: row.temperature_observation,
        })
        .collect()
}
