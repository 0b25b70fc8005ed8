//! Repository trait for the `station` table.

use async_trait::async_trait;

use super::error::RepositoryResult;

/// Read access to station identifiers.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Fetch every station code in the store's natural row order.
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - One entry per station row, unsorted
    /// * `Err(RepositoryError)` - If the store cannot be queried
    async fn fetch_station_ids(&self) -> RepositoryResult<Vec<String>>;
}
