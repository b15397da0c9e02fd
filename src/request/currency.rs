//! Currency and chain normalization.
//!
//! Payment forms send free-form symbols ("usdt-trc20", "Bitcoin") and an
//! optional chain hint. Both are collapsed here into one canonical currency
//! symbol and one `Chain` variant so the rest of the pipeline never touches
//! raw user strings. Chain resolution is total: it always lands on a chain.

use serde::{Deserialize, Serialize};

/// Supported ledger networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Btc,
    Ltc,
    Eth,
    Tron,
}

impl Chain {
    /// Resolve the chain for a request.
    ///
    /// Priority: explicit hint markers, then the stable-coin default
    /// (USDT/USDC settle on Tron in this product), then the currency symbol
    /// read directly as a chain, then Btc.
    pub fn resolve(currency: &CanonicalCurrency, hint: Option<&str>) -> Chain {
        if let Some(hint) = hint {
            let hint = hint.to_ascii_uppercase();
            if hint.contains("TRON") || hint.contains("TRC") {
                return Chain::Tron;
            }
            if hint.contains("ETH") || hint.contains("ERC") {
                return Chain::Eth;
            }
            if hint.contains("LTC") || hint.contains("LITE") {
                return Chain::Ltc;
            }
            if hint.contains("BTC") || hint.contains("BITCOIN") {
                return Chain::Btc;
            }
        }

        if currency.is_stablecoin() {
            return Chain::Tron;
        }

        match currency.as_str() {
            "BTC" | "BITCOIN" => Chain::Btc,
            "LTC" | "LITECOIN" => Chain::Ltc,
            "ETH" | "ETHEREUM" => Chain::Eth,
            "TRX" | "TRON" => Chain::Tron,
            _ => Chain::Btc,
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Chain::Btc => "btc",
            Chain::Ltc => "ltc",
            Chain::Eth => "eth",
            Chain::Tron => "tron",
        };
        write!(f, "{}", name)
    }
}

/// Normalized currency symbol.
///
/// Uppercased, with chain-suffixed stable-coin variants ("USDT-TRC20",
/// "usdt (tron)") collapsed to the bare symbol. Used for tolerance and
/// confirmation lookups; chain selection also consults the hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalCurrency(String);

impl CanonicalCurrency {
    /// Normalize a raw currency string.
    pub fn normalize(raw: &str) -> Self {
        let upper = raw.trim().to_ascii_uppercase();
        if upper.starts_with("USDT") {
            return Self("USDT".to_string());
        }
        if upper.starts_with("USDC") {
            return Self("USDC".to_string());
        }
        Self(upper)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stable coins default to Tron when no chain hint says otherwise.
    pub fn is_stablecoin(&self) -> bool {
        matches!(self.0.as_str(), "USDT" | "USDC")
    }
}

impl std::fmt::Display for CanonicalCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
