//! Payment verification orchestrator.
//!
//! # Data Flow
//!
//! ```text
//! VerificationRequest
//!     → amount guard (reject non-positive before any remote call)
//!     → normalize currency + resolve chain
//!     → extract tx id from reference
//!     → hash verify ──verified──────────────┐
//!         │ failed / no id                   │
//!     → address scan → re-verify candidate ──┤
//!         │ nothing found                    ▼
//!     → PAYMENT_NOT_VERIFIED          tolerance check
//!                                            │
//!                              AMOUNT_MISMATCH or status + result
//! ```
//!
//! # Design Decisions
//!
//! - Hash verification always runs before address-scan discovery, and a
//!   discovered candidate is always re-verified through the adapter before
//!   it is trusted. Both orderings are invariants.
//! - Remote failures never propagate to the caller: each one is logged and
//!   collapsed into a `verified:false` result with a stable code.
//! - No retries and no shared mutable state. Repeated calls against an
//!   unchanged ledger return identical results, so retry policy belongs to
//!   the caller.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::amount::tolerance::ToleranceMatcher;
use crate::chains::source::{EvmSource, TronSource, UtxoSource};
use crate::chains::types::{ChainError, ChainResult, ScanQuery, TxQuery, TxStatus};
use crate::chains::{ChainAdapter, ChainAdapters};
use crate::config::schema::{CurrencyRule, CurrencyTable};
use crate::config::VerifierConfig;
use crate::explorer::{EvmExplorer, TronExplorer, UtxoExplorer};
use crate::observability::logging::mask_address;
use crate::observability::metrics;
use crate::request::currency::{CanonicalCurrency, Chain};
use crate::request::reference::extract;
use crate::verify::types::{
    DetectedBy, FailureCode, RequestError, VerificationRequest, VerificationResult,
};

/// Transfer located by either verification path, before the tolerance check.
struct LocatedTransfer {
    tx_id: String,
    amount: Option<Decimal>,
    confirmations: Option<u64>,
    reported: Option<TxStatus>,
    detected_by: DetectedBy,
}

/// Verifies claimed incoming payments against public ledger data.
pub struct PaymentVerifier {
    adapters: ChainAdapters,
    matcher: ToleranceMatcher,
    rules: Arc<CurrencyTable>,
}

impl PaymentVerifier {
    /// Build a verifier with explorer-backed sources from configuration.
    pub fn new(config: &VerifierConfig) -> ChainResult<Self> {
        let explorers = &config.explorers;
        let utxo = UtxoExplorer::new(&explorers.utxo_base_url, explorers.timeout_secs)?;
        let evm = EvmExplorer::new(
            &explorers.evm_base_url,
            &explorers.evm_api_key,
            explorers.timeout_secs,
        )?;
        let tron = TronExplorer::new(&explorers.tron_base_url, explorers.timeout_secs)?;
        Ok(Self::with_sources(
            Arc::new(utxo),
            Arc::new(evm),
            Arc::new(tron),
            &config.currencies,
        ))
    }

    /// Build a verifier over caller-supplied sources. Tests inject fakes here.
    pub fn with_sources(
        utxo: Arc<dyn UtxoSource>,
        evm: Arc<dyn EvmSource>,
        tron: Arc<dyn TronSource>,
        currencies: &[CurrencyRule],
    ) -> Self {
        let rules = Arc::new(CurrencyTable::from_rules(currencies));
        Self {
            adapters: ChainAdapters::new(utxo, evm, tron, Arc::clone(&rules)),
            matcher: ToleranceMatcher::new(Arc::clone(&rules)),
            rules,
        }
    }

    /// Verify one claimed payment.
    ///
    /// Returns `Err` only for malformed caller input. Every ledger-side
    /// outcome, including remote failures, arrives as a structured
    /// `VerificationResult`.
    pub async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResult, RequestError> {
        if request.amount <= Decimal::ZERO {
            return Err(RequestError::NonPositiveAmount);
        }

        let verification_id = Uuid::new_v4();
        let currency = CanonicalCurrency::normalize(&request.currency);
        let chain = Chain::resolve(&currency, request.chain_hint.as_deref());
        let band = self.matcher.band_for(&currency, request.amount, None);
        let adapter = self.adapters.adapter_for(chain);

        tracing::info!(
            verification_id = %verification_id,
            chain = %chain,
            currency = %currency,
            amount = %request.amount,
            "Verifying claimed payment"
        );

        let tx_id = request.reference.as_deref().and_then(extract);
        let mut failure_detail: Option<String> = None;
        let mut located: Option<LocatedTransfer> = None;

        if let Some(id) = tx_id.as_deref() {
            let query = TxQuery {
                chain,
                tx_id: id,
                address: request.address.as_deref(),
                expected: request.amount,
                currency: &currency,
                band,
            };
            match adapter.check_tx(&query).await {
                Ok(transfer) => {
                    located = Some(LocatedTransfer {
                        tx_id: transfer.tx_id,
                        amount: transfer.amount,
                        confirmations: transfer.confirmations,
                        reported: transfer.status,
                        detected_by: DetectedBy::TxHash,
                    });
                }
                Err(e) => {
                    if is_transport(&e) {
                        metrics::record_explorer_error(chain);
                    }
                    tracing::warn!(
                        verification_id = %verification_id,
                        chain = %chain,
                        tx_id = %id,
                        "Hash verification failed: {}",
                        e
                    );
                    failure_detail = Some(e.to_string());
                }
            }
        }

        if located.is_none() {
            if let Some(address) = request.address.as_deref() {
                let query = ScanQuery {
                    chain,
                    address,
                    expected: request.amount,
                    currency: &currency,
                    band,
                };
                located = self
                    .discover_and_reverify(verification_id, adapter, query, &mut failure_detail)
                    .await;
            }
        }

        let Some(located) = located else {
            let detail =
                failure_detail.unwrap_or_else(|| "no matching transaction found".to_string());
            tracing::info!(
                verification_id = %verification_id,
                chain = %chain,
                "Payment not verified: {}",
                detail
            );
            metrics::record_verification(chain, "not_verified");
            return Ok(VerificationResult::failure(
                FailureCode::PaymentNotVerified,
                detail,
            ));
        };

        let Some(received) = located.amount else {
            metrics::record_verification(chain, "not_verified");
            return Ok(VerificationResult::failure(
                FailureCode::PaymentNotVerified,
                "transaction found but its amount could not be read",
            ));
        };

        if !band.accepts(request.amount, received) {
            tracing::info!(
                verification_id = %verification_id,
                chain = %chain,
                tx_id = %located.tx_id,
                "Amount mismatch: received {}, expected {}",
                received,
                request.amount
            );
            metrics::record_verification(chain, "amount_mismatch");
            return Ok(VerificationResult {
                verified: false,
                tx_id: Some(located.tx_id),
                amount: Some(received),
                confirmations: located.confirmations,
                status: None,
                detected_by: Some(located.detected_by),
                error: Some(format!(
                    "received {} {}, expected {}",
                    received, currency, request.amount
                )),
                code: Some(FailureCode::AmountMismatch),
            });
        }

        // A confirmation count always decides against the threshold. Only
        // when no count is available does a source-reported status stand.
        let min_confirmations = self.rules.min_confirmations(&currency);
        let status = match located.confirmations {
            Some(count) if count >= min_confirmations => TxStatus::Confirmed,
            Some(_) => TxStatus::Pending,
            None => located.reported.unwrap_or(TxStatus::Pending),
        };

        tracing::info!(
            verification_id = %verification_id,
            chain = %chain,
            tx_id = %located.tx_id,
            status = ?status,
            "Payment verified"
        );
        metrics::record_verification(chain, "verified");

        Ok(VerificationResult {
            verified: true,
            tx_id: Some(located.tx_id),
            amount: Some(received),
            confirmations: located.confirmations,
            status: Some(status),
            detected_by: Some(located.detected_by),
            error: None,
            code: None,
        })
    }

    /// Fallback path: scan address activity, then re-verify the candidate
    /// through the adapter. The scanner's own numbers are never trusted
    /// directly; adapter fields win and the candidate only fills gaps.
    async fn discover_and_reverify(
        &self,
        verification_id: Uuid,
        adapter: &dyn ChainAdapter,
        query: ScanQuery<'_>,
        failure_detail: &mut Option<String>,
    ) -> Option<LocatedTransfer> {
        metrics::record_discovery(query.chain);
        let masked = mask_address(query.address);

        let candidate = match adapter.discover(&query).await {
            Ok(candidate) => candidate,
            Err(e) => {
                if is_transport(&e) {
                    metrics::record_explorer_error(query.chain);
                }
                tracing::warn!(
                    verification_id = %verification_id,
                    chain = %query.chain,
                    address = %masked,
                    "Address scan failed: {}",
                    e
                );
                failure_detail.get_or_insert(e.to_string());
                None
            }
        }?;

        tracing::info!(
            verification_id = %verification_id,
            chain = %query.chain,
            address = %masked,
            tx_id = %candidate.tx_id,
            "Discovered candidate transaction"
        );

        let recheck = TxQuery {
            chain: query.chain,
            tx_id: &candidate.tx_id,
            address: Some(query.address),
            expected: query.expected,
            currency: query.currency,
            band: query.band,
        };
        match adapter.check_tx(&recheck).await {
            Ok(transfer) => Some(LocatedTransfer {
                tx_id: transfer.tx_id,
                amount: transfer.amount.or(Some(candidate.amount)),
                confirmations: transfer.confirmations.or(candidate.confirmations),
                reported: transfer.status.or(Some(candidate.status)),
                detected_by: DetectedBy::AddressScan,
            }),
            Err(e) => {
                if is_transport(&e) {
                    metrics::record_explorer_error(query.chain);
                }
                tracing::warn!(
                    verification_id = %verification_id,
                    chain = %query.chain,
                    tx_id = %candidate.tx_id,
                    "Discovered candidate failed re-verification: {}",
                    e
                );
                failure_detail.get_or_insert(e.to_string());
                None
            }
        }
    }
}

/// Explorer-side failures, as opposed to domain outcomes like a missing
/// transaction or a wrong recipient.
fn is_transport(error: &ChainError) -> bool {
    matches!(
        error,
        ChainError::Http(_) | ChainError::Timeout(_) | ChainError::Api(_) | ChainError::Decode(_)
    )
}
