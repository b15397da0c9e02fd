//! Verification metrics.
//!
//! Thin wrappers over the `metrics` facade so call sites stay one line and
//! metric names live in a single place. Counters only; a verification is a
//! short unit of work and the interesting numbers are outcome rates.

use metrics::counter;

use crate::request::currency::Chain;

/// Count one finished verification by chain and outcome
/// (`verified`, `amount_mismatch`, `not_verified`).
pub fn record_verification(chain: Chain, outcome: &'static str) {
    counter!(
        "verifier_verifications_total",
        "chain" => chain.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Count one explorer-side failure (timeout, HTTP error, bad payload).
pub fn record_explorer_error(chain: Chain) {
    counter!("verifier_explorer_errors_total", "chain" => chain.to_string()).increment(1);
}

/// Count one address-scan fallback attempt.
pub fn record_discovery(chain: Chain) {
    counter!("verifier_address_scans_total", "chain" => chain.to_string()).increment(1);
}
