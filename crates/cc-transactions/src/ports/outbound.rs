//! # Outbound Ports
//!
//! Driven ports the transactions subsystem depends on.

use async_trait::async_trait;
use shared_types::{Transaction, TxStatus};

use crate::domain::TransactionError;

/// Persistence for outbound transactions.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
/// backend failures and invalid input.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Insert or replace a transaction, indexing it by id and, when set, by hash.
    ///
    /// # Errors
    /// - `InvalidTransaction`: the transaction has an empty id
    async fn save(&self, tx: &Transaction) -> Result<(), TransactionError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Transaction>, TransactionError>;

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Transaction>, TransactionError>;

    /// Set the status of `id`. A non-empty `tx_hash` is recorded and indexed.
    ///
    /// # Errors
    /// - `NotFound`: no transaction with this id
    async fn update_status(
        &self,
        id: &str,
        status: TxStatus,
        tx_hash: Option<&str>,
    ) -> Result<(), TransactionError>;

    /// Transactions in `pending` status, at most `limit` of them (`0` = no limit).
    async fn list_pending(&self, limit: usize) -> Result<Vec<Transaction>, TransactionError>;
}
