mod memory;
#[cfg(test)]
mod tests;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use memory::MemoryRepository;

use crate::models::{Transaction, TransactionId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Repository query failed: {0}")]
    Query(String),
    #[error("Batch commit aborted, no documents were deleted: {0}")]
    BatchAborted(String),
}

/// The persistence collaborator the reconciliation engine runs against.
///
/// In production this fronts a hosted document store; here the in-memory
/// [`MemoryRepository`] stands in for it. Implementations own ordering and
/// atomicity: listings come back date-ascending, and `delete_batch` is a
/// single all-or-nothing commit.
#[async_trait]
pub trait TransactionRepository: Send + Sync + 'static {
    /// Every transaction, ordered by event date ascending.
    async fn list_all(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Whether a document with this id currently exists.
    async fn exists(&self, id: &str) -> Result<bool, StoreError>;

    /// Deletes every listed document in one atomic commit. Either all of the
    /// deletes land or none do.
    async fn delete_batch(&self, ids: &[TransactionId]) -> Result<(), StoreError>;

    /// Transactions with an event date at or after the cutoff, ordered by
    /// event date ascending.
    async fn list_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Transaction>, StoreError>;
}
