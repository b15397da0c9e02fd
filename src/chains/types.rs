//! Chain-specific types and error definitions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::amount::tolerance::ToleranceBand;
use crate::request::currency::{CanonicalCurrency, Chain};

/// Errors that can occur during chain verification operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Explorer connection or request failed.
    #[error("explorer request failed: {0}")]
    Http(String),

    /// Explorer request timed out.
    #[error("explorer request timed out after {0} seconds")]
    Timeout(u64),

    /// Explorer answered with an error payload or an unexpected shape.
    #[error("explorer API error: {0}")]
    Api(String),

    /// No transaction with this id on the chain.
    #[error("transaction not found: {0}")]
    NotFound(String),

    /// The transaction exists but does not pay the expected address.
    #[error("transaction does not pay the expected address")]
    WrongRecipient,

    /// Payment direction cannot be checked without a destination address.
    #[error("a receiving address is required to verify payment direction")]
    RecipientRequired,

    /// The transaction was reverted or failed on-chain.
    #[error("transaction failed on-chain")]
    Reverted,

    /// A reported value could not be converted to a decimal amount.
    #[error("could not decode amount: {0}")]
    Decode(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Lifecycle status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Seen on-chain but below the confirmation threshold.
    Pending,
    /// Buried under enough blocks to count as final.
    Confirmed,
}

/// Transfer details confirmed by a chain adapter.
///
/// Fields are optional where a source cannot report them; the orchestrator
/// fills gaps from the discovery candidate when there is one.
#[derive(Debug, Clone)]
pub struct VerifiedTransfer {
    pub tx_id: String,
    pub amount: Option<Decimal>,
    pub confirmations: Option<u64>,
    pub status: Option<TxStatus>,
}

/// Candidate produced by address-activity scanning.
///
/// Transient: always re-verified through the adapter before being trusted,
/// never persisted.
#[derive(Debug, Clone)]
pub struct DiscoveredTransaction {
    pub tx_id: String,
    pub amount: Decimal,
    pub confirmations: Option<u64>,
    pub status: TxStatus,
}

/// Parameters for verifying a known transaction id.
#[derive(Debug, Clone, Copy)]
pub struct TxQuery<'a> {
    pub chain: Chain,
    pub tx_id: &'a str,
    pub address: Option<&'a str>,
    pub expected: Decimal,
    pub currency: &'a CanonicalCurrency,
    pub band: ToleranceBand,
}

/// Parameters for address-activity discovery.
#[derive(Debug, Clone, Copy)]
pub struct ScanQuery<'a> {
    pub chain: Chain,
    pub address: &'a str,
    pub expected: Decimal,
    pub currency: &'a CanonicalCurrency,
    pub band: ToleranceBand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChainError::Timeout(10);
        assert_eq!(err.to_string(), "explorer request timed out after 10 seconds");

        let err = ChainError::NotFound("abc123".to_string());
        assert!(err.to_string().contains("abc123"));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&TxStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!(serde_json::to_string(&TxStatus::Confirmed).unwrap(), "\"confirmed\"");
    }
}
