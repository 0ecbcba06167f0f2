use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Read access to one record kind in the source of truth.
///
/// Slices are always ordered by identifier, newest first.
#[async_trait]
pub trait RecordRepository<R>: Send + Sync {
    /// Total number of records of this kind.
    async fn count(&self) -> DomainResult<u64>;

    /// Records at positions `[skip, skip + take)` of the descending order.
    async fn list_page(&self, skip: u64, take: u64) -> DomainResult<Vec<R>>;

    /// Get a record by identifier.
    async fn get(&self, id: i64) -> DomainResult<Option<R>>;
}
