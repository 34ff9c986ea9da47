//! # Connector Events
//!
//! Payloads published on the event bus. The bus treats these as opaque;
//! producers and consumers of a topic agree on the variant.

use serde::{Deserialize, Serialize};

use crate::entities::{Receipt, Timestamp, Transaction};

/// Well-known bus topics.
pub mod topics {
    /// A new transaction was accepted for processing.
    pub const TRANSACTION_CREATED: &str = "transaction.created";
    /// A transaction was signed.
    pub const TRANSACTION_SIGNED: &str = "transaction.signed";
    /// A signed transaction was broadcast.
    pub const TRANSACTION_SENT: &str = "transaction.sent";
    /// A transaction was mined.
    pub const TRANSACTION_CONFIRMED: &str = "transaction.confirmed";
    /// A transaction failed at any stage.
    pub const TRANSACTION_FAILED: &str = "transaction.failed";
}

/// Lifecycle events of an outbound transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxEvent {
    /// Transaction accepted.
    Created {
        transaction: Transaction,
        timestamp: Timestamp,
    },
    /// Transaction signed.
    Signed {
        tx_id: String,
        tx_hash: String,
        raw_tx_hex: String,
        timestamp: Timestamp,
    },
    /// Transaction broadcast to the node.
    Sent {
        tx_id: String,
        tx_hash: String,
        timestamp: Timestamp,
    },
    /// Transaction included in a block.
    Confirmed {
        tx_id: String,
        tx_hash: String,
        receipt: Receipt,
        timestamp: Timestamp,
    },
    /// Transaction failed.
    Failed {
        tx_id: String,
        error: String,
        timestamp: Timestamp,
    },
}

impl TxEvent {
    /// Stable event name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Created { .. } => "TxCreated",
            Self::Signed { .. } => "TxSigned",
            Self::Sent { .. } => "TxSent",
            Self::Confirmed { .. } => "TxConfirmed",
            Self::Failed { .. } => "TxFailed",
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Created { timestamp, .. }
            | Self::Signed { timestamp, .. }
            | Self::Sent { timestamp, .. }
            | Self::Confirmed { timestamp, .. }
            | Self::Failed { timestamp, .. } => *timestamp,
        }
    }

    /// Topic this event is published on.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Created { .. } => topics::TRANSACTION_CREATED,
            Self::Signed { .. } => topics::TRANSACTION_SIGNED,
            Self::Sent { .. } => topics::TRANSACTION_SENT,
            Self::Confirmed { .. } => topics::TRANSACTION_CONFIRMED,
            Self::Failed { .. } => topics::TRANSACTION_FAILED,
        }
    }

    /// Id of the transaction this event concerns.
    #[must_use]
    pub fn tx_id(&self) -> &str {
        match self {
            Self::Created { transaction, .. } => &transaction.id,
            Self::Signed { tx_id, .. }
            | Self::Sent { tx_id, .. }
            | Self::Confirmed { tx_id, .. }
            | Self::Failed { tx_id, .. } => tx_id,
        }
    }
}

/// Payload type carried by the connector's event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectorEvent {
    /// Published by the intake on [`topics::TRANSACTION_CREATED`].
    TransactionCreated(Transaction),
    /// Any later lifecycle notification.
    Lifecycle(TxEvent),
}

impl ConnectorEvent {
    /// Name of the variant, used in handler error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TransactionCreated(_) => "TransactionCreated",
            Self::Lifecycle(event) => event.event_type(),
        }
    }
}

impl From<Transaction> for ConnectorEvent {
    fn from(tx: Transaction) -> Self {
        Self::TransactionCreated(tx)
    }
}

impl From<TxEvent> for ConnectorEvent {
    fn from(event: TxEvent) -> Self {
        Self::Lifecycle(event)
    }
}
