//! Repository implementations module.
//!
//! - `local`: In-memory implementation for unit testing and local development
//! - `sqlite`: Read-only SQLite implementation with Diesel
pub mod local;
#[cfg(feature = "sqlite-repo")]
pub mod sqlite;

pub use local::{LocalDataset, LocalRepository};
#[cfg(feature = "sqlite-repo")]
pub use sqlite::{PoolStats, SqliteConfig, SqliteRepository};
