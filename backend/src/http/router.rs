//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing) and
//! returns an axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Prefix shared by every data route.
pub const API_PREFIX: &str = "/api/v1.0";

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Read-only public data: any origin may fetch it.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Static segments take precedence over `{start}`, so "stations" is never
    // parsed as a date.
    let api_v1 = Router::new()
        .route("/precipitation", get(handlers::precipitation))
        .route("/stations", get(handlers::stations))
        .route("/tobs", get(handlers::tobs))
        .route("/{start}", get(handlers::temperature_stats_from))
        .route("/{start}/{end}", get(handlers::temperature_stats_between));

    Router::new()
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health_check))
        .nest(API_PREFIX, api_v1)
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetConfig;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::ClimateRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn ClimateRepository>;
        let state = AppState::new(repo, DatasetConfig::default());
        let _router = create_router(state);
    }
}
