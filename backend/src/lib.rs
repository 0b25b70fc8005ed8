//! # Climate API
//!
//! Read-only HTTP API over the Hawaii climate dataset: daily precipitation
//! and temperature observations from a fixed set of weather stations.
//!
//! ## Routes
//!
//! | Route                        | Body                                  |
//! |------------------------------|---------------------------------------|
//! | `GET /`                      | plain-text route listing              |
//! | `GET /api/v1.0/precipitation`| `{"<date>": <prcp or null>, ...}`     |
//! | `GET /api/v1.0/stations`     | `["<station>", ...]`                  |
//! | `GET /api/v1.0/tobs`         | `[{"<date>": <tobs>}, ...]`           |
//! | `GET /api/v1.0/{start}`      | `{"TMIN": n, "TAVG": n, "TMAX": n}`   |
//! | `GET /api/v1.0/{start}/{end}`| same shape                            |
//!
//! ## Architecture
//!
//! - [`api`]: response bodies
//! - [`config`]: dataset constants and startup configuration
//! - [`models`]: table rows, filters and date helpers
//! - [`db`]: repository traits and the local / SQLite backends
//! - [`services`]: the query operations behind each route
//! - [`http`]: Axum router, handlers and error mapping

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
