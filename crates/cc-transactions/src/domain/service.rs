//! Transaction service: the domain logic behind [`TransactionApi`].

use std::sync::Arc;

use async_trait::async_trait;
use shared_bus::EventContext;
use shared_types::{now_millis, Transaction, TxStatus};

use crate::domain::TransactionError;
use crate::ports::{TransactionApi, TransactionRepository};
use crate::COMPONENT;

/// Creates and queries outbound transactions.
pub struct TransactionService {
    repo: Arc<dyn TransactionRepository>,
}

impl TransactionService {
    pub fn new(repo: Arc<dyn TransactionRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl TransactionApi for TransactionService {
    async fn create_transaction(
        &self,
        ctx: &EventContext,
        mut tx: Transaction,
    ) -> Result<Transaction, TransactionError> {
        if ctx.is_cancelled() {
            return Err(TransactionError::Cancelled);
        }

        let now = now_millis();
        tx.status = TxStatus::Pending;
        if tx.created_at == 0 {
            tx.created_at = now;
        }
        tx.updated_at = now;

        self.repo.save(&tx).await?;

        cc_telemetry::log_tx_event!(
            info,
            COMPONENT,
            "Transaction created",
            tx.id,
            tx_hash = %tx.tx_hash,
            chain = %tx.chain,
            correlation_id = %ctx.correlation_id()
        );
        Ok(tx)
    }

    async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>, TransactionError> {
        self.repo.find_by_id(id).await
    }

    async fn pending_transactions(
        &self,
        limit: usize,
    ) -> Result<Vec<Transaction>, TransactionError> {
        self.repo.list_pending(limit).await
    }
}
