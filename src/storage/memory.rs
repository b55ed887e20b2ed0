use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::{Transaction, TransactionId};
use crate::storage::{StoreError, TransactionRepository};

/// In-memory stand-in for the hosted document store.
///
/// Backs the CLI and the tests. A single coarse lock gives `delete_batch` the
/// same atomicity the real store's batched writes provide: the whole batch is
/// validated and applied under one write guard.
pub struct MemoryRepository {
    documents: RwLock<HashMap<TransactionId, Transaction>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, transaction: Transaction) {
        self.documents
            .write()
            .await
            .insert(transaction.id.clone(), transaction);
    }

    pub async fn count(&self) -> usize {
        self.documents.read().await.len()
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionRepository for MemoryRepository {
    async fn list_all(&self) -> Result<Vec<Transaction>, StoreError> {
        let guard = self.documents.read().await;

        let mut all: Vec<Transaction> = guard.values().cloned().collect();
        all.sort_by_key(|transaction| transaction.date);

        Ok(all)
    }

    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.documents.read().await.contains_key(id))
    }

    async fn delete_batch(&self, ids: &[TransactionId]) -> Result<(), StoreError> {
        let mut guard = self.documents.write().await;

        // Validate up front so a missing document aborts the whole commit.
        if let Some(missing) = ids.iter().find(|id| !guard.contains_key(id.as_str())) {
            return Err(StoreError::BatchAborted(format!(
                "transaction [{missing}] does not exist"
            )));
        }

        for id in ids {
            guard.remove(id);
        }

        Ok(())
    }

    async fn list_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Transaction>, StoreError> {
        let guard = self.documents.read().await;

        let mut recent: Vec<Transaction> = guard
            .values()
            .filter(|transaction| transaction.date >= cutoff)
            .cloned()
            .collect();
        recent.sort_by_key(|transaction| transaction.date);

        Ok(recent)
    }
}
