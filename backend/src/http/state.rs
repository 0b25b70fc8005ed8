//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::DatasetConfig;
use crate::db::repository::ClimateRepository;

/// Shared application state passed to all handlers.
///
/// Both fields are read-only after startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    /// Store the query routes read from
    pub repository: Arc<dyn ClimateRepository>,
    /// Anchor date and station used by the trailing-window routes
    pub dataset: Arc<DatasetConfig>,
}

impl AppState {
    /// Create a new application state with the given repository and dataset settings.
    pub fn new(repository: Arc<dyn ClimateRepository>, dataset: DatasetConfig) -> Self {
        Self {
            repository,
            dataset: Arc::new(dataset),
        }
    }
}
