//! Service layer for the climate routes.
//!
//! Services sit between the HTTP handlers and the repository: they turn
//! route parameters into store filters and store rows into response bodies.

pub mod climate;
pub mod reshape;


pub use climate::{
    list_stations, most_active_station_tobs, precipitation_summary, temperature_stats_between,
    temperature_stats_from, welcome, ServiceError, ServiceResult, WELCOME_MESSAGE,
};
