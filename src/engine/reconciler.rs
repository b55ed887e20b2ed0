use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::engine::dedup::{
    find_duplicate_groups, is_duplicate_pair, DuplicateGroup, GroupingStrategy, DEFAULT_WINDOW_MS,
    PRESUBMIT_LOOKBACK_MS,
};
use crate::engine::ReconcileError;
use crate::models::{Transaction, TransactionId};
use crate::storage::TransactionRepository;

/// Outcome of a successful destructive cleanup run.
///
/// `removed == 0` is a real success, not a failure: it means there was
/// nothing to do. The message is ready for display to an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub removed: usize,
    pub message: String,
}

/// Duplicate reconciliation engine, bound to a transaction repository.
///
/// Stateless between calls: every operation re-reads the repository, computes
/// what it needs, and discards it. Concurrent submitters can still race the
/// pre-submit guard; `reconcile` is the authoritative backstop.
pub struct ReconcileEngine<R> {
    repository: Arc<R>,
    window_ms: i64,
    strategy: GroupingStrategy,
}

impl<R: TransactionRepository> ReconcileEngine<R> {
    /// Creates an engine with the 60 second window and anchored grouping.
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            window_ms: DEFAULT_WINDOW_MS,
            strategy: GroupingStrategy::default(),
        }
    }

    pub fn with_window_ms(mut self, window_ms: i64) -> Self {
        self.window_ms = window_ms;
        self
    }

    pub fn with_strategy(mut self, strategy: GroupingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Loads the full transaction history and reports its duplicate groups
    /// without touching anything.
    pub async fn scan(&self) -> Result<Vec<DuplicateGroup>, ReconcileError> {
        let transactions = self
            .repository
            .list_all()
            .await
            .map_err(ReconcileError::Load)?;

        Ok(find_duplicate_groups(&transactions, self.window_ms, self.strategy))
    }

    /// Destructive cleanup: deletes every non-canonical duplicate in a single
    /// atomic batch.
    ///
    /// Each candidate is re-checked for existence right before the batch is
    /// built; a candidate another actor already deleted is skipped silently
    /// and excluded from the removed count. Because the batch commit is
    /// all-or-nothing, a failed run deletes nothing and can simply be retried.
    pub async fn reconcile(&self) -> Result<ReconcileReport, ReconcileError> {
        let transactions = self
            .repository
            .list_all()
            .await
            .map_err(ReconcileError::Load)?;

        let groups = find_duplicate_groups(&transactions, self.window_ms, self.strategy);

        if groups.is_empty() {
            return Ok(ReconcileReport {
                removed: 0,
                message: "No duplicate transactions found".to_string(),
            });
        }

        let mut batch: Vec<TransactionId> = Vec::new();

        for group in &groups {
            for loser in group.removable() {
                match self.repository.exists(&loser.id).await {
                    Ok(true) => batch.push(loser.id.clone()),
                    Ok(false) => {
                        debug!("Transaction [{}] vanished before cleanup, skipping", loser.id);
                    }
                    Err(source) => {
                        return Err(ReconcileError::Lookup {
                            id: loser.id.clone(),
                            source,
                        });
                    }
                }
            }
        }

        if batch.is_empty() {
            return Ok(ReconcileReport {
                removed: 0,
                message: "All duplicates were already removed".to_string(),
            });
        }

        self.repository
            .delete_batch(&batch)
            .await
            .map_err(ReconcileError::Commit)?;

        let removed = batch.len();
        info!(
            "Removed {removed} duplicate transaction(s) across {} group(s)",
            groups.len()
        );

        Ok(ReconcileReport {
            removed,
            message: format!("Removed {removed} duplicate transaction(s)"),
        })
    }

    /// Pre-submit guard: checks a candidate against repository entries from
    /// the last two minutes of server time, returning the first existing
    /// record it duplicates.
    ///
    /// Best effort only. Two near-simultaneous submissions can both pass
    /// before either write lands; `reconcile` cleans up whatever slips
    /// through.
    pub async fn check_incoming(
        &self,
        candidate: &Transaction,
    ) -> Result<Option<Transaction>, ReconcileError> {
        let cutoff = Utc::now() - Duration::milliseconds(PRESUBMIT_LOOKBACK_MS);

        let recent = self
            .repository
            .list_since(cutoff)
            .await
            .map_err(ReconcileError::Load)?;

        Ok(recent
            .into_iter()
            .find(|existing| is_duplicate_pair(candidate, existing, self.window_ms)))
    }
}
