//! Verification request and result types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chains::types::TxStatus;

/// A claimed incoming payment to check against the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Raw transaction hash or explorer link, if the payer supplied one.
    #[serde(default)]
    pub reference: Option<String>,
    /// Receiving address, used for fallback discovery.
    #[serde(default)]
    pub address: Option<String>,
    /// Expected amount in currency units. Must be positive.
    pub amount: Decimal,
    /// Currency as the payer stated it, e.g. "eth" or "USDT-TRC20".
    pub currency: String,
    /// Free-form chain hint, e.g. "tron" or "ERC20".
    #[serde(default)]
    pub chain_hint: Option<String>,
}

/// Caller-input bug, rejected before any remote call.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("expected amount must be positive")]
    NonPositiveAmount,
}

/// Stable failure codes callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    PaymentNotVerified,
    AmountMismatch,
}

/// How the transaction was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedBy {
    TxHash,
    AddressScan,
}

/// Outcome of one verification. Optional fields are populated as far as the
/// flow got.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    /// Amount actually received, in currency units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TxStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_by: Option<DetectedBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<FailureCode>,
}

impl VerificationResult {
    pub fn failure(code: FailureCode, error: impl Into<String>) -> Self {
        Self {
            verified: false,
            tx_id: None,
            amount: None,
            confirmations: None,
            status: None,
            detected_by: None,
            error: Some(error.into()),
            code: Some(code),
        }
    }
}
