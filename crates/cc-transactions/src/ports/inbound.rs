//! # Inbound Port - TransactionApi
//!
//! Driving port used by the bus handler and other adapters.

use async_trait::async_trait;
use shared_bus::EventContext;
use shared_types::Transaction;

use crate::domain::TransactionError;

/// Primary API of the transactions subsystem.
///
/// # Example
///
/// ```rust,ignore
/// use cc_transactions::ports::TransactionApi;
///
/// async fn example(api: &impl TransactionApi, tx: Transaction) {
///     let stored = api.create_transaction(&EventContext::background(), tx).await?;
///     assert_eq!(stored.status, TxStatus::Pending);
/// }
/// ```
#[async_trait]
pub trait TransactionApi: Send + Sync {
    /// Mark `tx` pending, stamp it and persist it.
    ///
    /// # Errors
    /// - `Cancelled`: `ctx` was cancelled before the write
    /// - `InvalidTransaction`: `tx` has no id
    /// - `Storage`: the repository failed
    async fn create_transaction(
        &self,
        ctx: &EventContext,
        tx: Transaction,
    ) -> Result<Transaction, TransactionError>;

    async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>, TransactionError>;

    /// Pending transactions, at most `limit` (`0` = no limit).
    async fn pending_transactions(&self, limit: usize)
        -> Result<Vec<Transaction>, TransactionError>;
}
