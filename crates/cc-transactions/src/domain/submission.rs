//! Raw transaction submissions as received from the outside world.

use serde::{Deserialize, Serialize};
use shared_types::{Transaction, TxStatus, U256};
use uuid::Uuid;

use crate::domain::TransactionError;

/// A transaction request with every numeric field still in string form.
///
/// Amounts are decimal integers in wei. An empty amount means zero and an
/// empty `to` means contract creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSubmission {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub chain: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub gas: String,
    #[serde(default)]
    pub gas_price: String,
}

impl TransactionSubmission {
    /// Validate the submission and build a fresh transaction with a new id.
    ///
    /// # Errors
    /// - `InvalidGas`: `gas` is not an unsigned 64-bit integer
    /// - `InvalidAmount`: `amount` or `gas_price` is not a decimal integer
    pub fn into_transaction(self) -> Result<Transaction, TransactionError> {
        let gas = self
            .gas
            .trim()
            .parse::<u64>()
            .map_err(|_| TransactionError::InvalidGas(self.gas.clone()))?;
        let value = parse_amount("amount", &self.amount)?;
        let gas_price = parse_amount("gas_price", &self.gas_price)?;

        let to = match self.to.trim() {
            "" => None,
            to => Some(to.to_string()),
        };

        Ok(Transaction {
            id: Uuid::new_v4().to_string(),
            from: self.from,
            chain: self.chain,
            to,
            value,
            gas,
            gas_price,
            status: TxStatus::Unknown,
            ..Default::default()
        })
    }
}

fn parse_amount(field: &'static str, raw: &str) -> Result<U256, TransactionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(trimmed).map_err(|_| TransactionError::InvalidAmount {
        field,
        value: raw.to_string(),
    })
}
