//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Transactions**: `Transaction`, `TxStatus`
//! - **Receipts**: `Receipt`, `ReceiptStatus`, `Log`, `LogFilter`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseStatusError;

// Re-export U256 from primitive-types for amounts and fees
pub use primitive_types::U256;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Current time as a [`Timestamp`].
pub fn now_millis() -> Timestamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as Timestamp
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Lifecycle status of an outbound transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    #[default]
    Unknown,
    Pending,
    Signed,
    Sent,
    Confirmed,
    Failed,
    Cancelled,
}

impl TxStatus {
    /// Lowercase name used in logs and APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Signed => "signed",
            Self::Sent => "sent",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Whether no further transition is expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "signed" => Ok(Self::Signed),
            "sent" => Ok(Self::Sent),
            "confirmed" => Ok(Self::Confirmed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            "unknown" => Ok(Self::Unknown),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// An outbound transaction tracked by the connector.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transaction {
    /// Connector-assigned identifier.
    pub id: String,
    /// Sender address (hex).
    pub from: String,
    /// Logical chain name (e.g. "ETH", "POLYGON") used to select the node.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chain: String,
    /// Recipient address; `None` for contract creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Amount in wei.
    pub value: U256,
    /// Gas limit.
    pub gas: u64,
    /// Legacy gas price in wei.
    pub gas_price: U256,
    /// EIP-1559 tip. When set together with `max_fee_per_gas` a dynamic-fee
    /// transaction is produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,
    /// EIP-1559 fee cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,
    pub nonce: u64,
    /// Call data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
    pub chain_id: Option<U256>,
    /// Signed raw transaction, hex encoded.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw_tx_hex: String,
    /// Hash assigned once signed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tx_hash: String,
    pub status: TxStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<Timestamp>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Transaction {
    /// Whether this transaction uses EIP-1559 fee fields.
    pub fn is_dynamic_fee(&self) -> bool {
        self.max_priority_fee_per_gas.is_some() && self.max_fee_per_gas.is_some()
    }

    /// Upper bound on the fee paid: `gas * (max_fee_per_gas | gas_price)`.
    pub fn max_fee(&self) -> U256 {
        let price = self.max_fee_per_gas.unwrap_or(self.gas_price);
        price.saturating_mul(U256::from(self.gas))
    }
}

// =============================================================================
// RECEIPTS
// =============================================================================

/// Execution outcome recorded in a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReceiptStatus {
    #[default]
    Unknown,
    Failed,
    Success,
}

/// A log entry emitted during execution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Log {
    pub address: String,
    pub topics: Vec<String>,
    pub data: Vec<u8>,
    pub block_number: u64,
    pub tx_hash: String,
    pub log_index: u32,
}

/// Filter for log queries.
///
/// `topics` is positional: the outer list is AND, each inner list is OR.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_block: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_block: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<Vec<String>>,
}

impl LogFilter {
    /// Whether `log` satisfies this filter.
    pub fn matches(&self, log: &Log) -> bool {
        if self.from_block.is_some_and(|from| log.block_number < from) {
            return false;
        }
        if self.to_block.is_some_and(|to| log.block_number > to) {
            return false;
        }
        if !self.addresses.is_empty()
            && !self
                .addresses
                .iter()
                .any(|a| a.eq_ignore_ascii_case(&log.address))
        {
            return false;
        }
        self.topics.iter().enumerate().all(|(position, alternatives)| {
            alternatives.is_empty()
                || log
                    .topics
                    .get(position)
                    .is_some_and(|topic| alternatives.iter().any(|alt| alt == topic))
        })
    }
}

/// Receipt of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: String,
    pub block_number: u64,
    pub block_hash: String,
    pub status: ReceiptStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    pub logs: Vec<Log>,
    pub gas_used: u64,
    pub cumulative_gas_used: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_gas_price: Option<U256>,
}
