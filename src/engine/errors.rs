use thiserror::Error;

use crate::models::TransactionId;
use crate::storage::StoreError;

/// Failures surfaced by the reconciliation engine.
///
/// Every engine entry point converts repository trouble into one of these and
/// returns it; nothing panics across the boundary. A vanished cleanup
/// candidate is deliberately not represented here, it is skipped, not failed.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Failed to load transactions from the repository: {0}")]
    Load(#[source] StoreError),
    #[error("Failed to re-check transaction [{id}] before cleanup: {source}")]
    Lookup {
        id: TransactionId,
        #[source]
        source: StoreError,
    },
    #[error("Cleanup batch failed to commit, nothing was deleted: {0}")]
    Commit(#[source] StoreError),
}
