//! In-memory [`TransactionRepository`].

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{now_millis, Transaction, TxStatus};

use crate::domain::TransactionError;
use crate::ports::TransactionRepository;

#[derive(Default)]
struct Store {
    by_id: HashMap<String, Transaction>,
    /// tx_hash -> id
    by_hash: HashMap<String, String>,
}

/// Process-local transaction store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryTransactionRepository {
    store: RwLock<Store>,
}

impl Store {
    /// Drop the hash entry of `id` if it points at `previous` and the hash is changing.
    fn unlink_hash(&mut self, id: &str, previous: &str, next: &str) {
        if previous.is_empty() || previous == next {
            return;
        }
        if self.by_hash.get(previous).is_some_and(|owner| owner == id) {
            self.by_hash.remove(previous);
        }
    }
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored transactions.
    pub fn len(&self) -> usize {
        self.store.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn save(&self, tx: &Transaction) -> Result<(), TransactionError> {
        if tx.id.is_empty() {
            return Err(TransactionError::InvalidTransaction(
                "transaction id is empty".into(),
            ));
        }

        let mut store = self.store.write();
        let previous = store.by_id.get(&tx.id).map(|old| old.tx_hash.clone());
        if let Some(previous) = previous {
            store.unlink_hash(&tx.id, &previous, &tx.tx_hash);
        }
        if !tx.tx_hash.is_empty() {
            store.by_hash.insert(tx.tx_hash.clone(), tx.id.clone());
        }
        store.by_id.insert(tx.id.clone(), tx.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Transaction>, TransactionError> {
        Ok(self.store.read().by_id.get(id).cloned())
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Transaction>, TransactionError> {
        let store = self.store.read();
        Ok(store
            .by_hash
            .get(hash)
            .and_then(|id| store.by_id.get(id))
            .cloned())
    }

    async fn update_status(
        &self,
        id: &str,
        status: TxStatus,
        tx_hash: Option<&str>,
    ) -> Result<(), TransactionError> {
        let mut store = self.store.write();

        let tx = store
            .by_id
            .get_mut(id)
            .ok_or_else(|| TransactionError::NotFound(id.to_string()))?;
        tx.status = status;
        tx.updated_at = now_millis();

        let Some(hash) = tx_hash.filter(|h| !h.is_empty()) else {
            return Ok(());
        };
        let previous = std::mem::replace(&mut tx.tx_hash, hash.to_string());
        store.unlink_hash(id, &previous, hash);
        store.by_hash.insert(hash.to_string(), id.to_string());
        Ok(())
    }

    async fn list_pending(&self, limit: usize) -> Result<Vec<Transaction>, TransactionError> {
        let store = self.store.read();
        let mut pending: Vec<Transaction> = store
            .by_id
            .values()
            .filter(|tx| tx.status == TxStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        if limit > 0 {
            pending.truncate(limit);
        }
        Ok(pending)
    }
}
