//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! verifier. All types derive Serde traits for deserialization from config
//! files.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::request::currency::CanonicalCurrency;

/// Confirmations required for currencies without a configured rule.
pub const DEFAULT_MIN_CONFIRMATIONS: u64 = 6;

/// Root configuration for the payment verifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Block-explorer endpoints and HTTP settings.
    pub explorers: ExplorerConfig,

    /// Per-currency verification rules. Listing any entry replaces the
    /// built-in rules entirely.
    pub currencies: Vec<CurrencyRule>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            explorers: ExplorerConfig::default(),
            currencies: default_currency_rules(),
        }
    }
}

/// Block-explorer endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Base URL of the BlockCypher-style UTXO API (BTC and LTC).
    pub utxo_base_url: String,

    /// Base URL of the Etherscan-style account API.
    pub evm_base_url: String,

    /// API key for the Etherscan-style API (empty = anonymous tier).
    pub evm_api_key: String,

    /// Base URL of the Tronscan-style API.
    pub tron_base_url: String,

    /// Request timeout for explorer calls in seconds.
    pub timeout_secs: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            utxo_base_url: "https://api.blockcypher.com/v1".to_string(),
            evm_base_url: "https://api.etherscan.io/api".to_string(),
            evm_api_key: String::new(),
            tron_base_url: "https://apilist.tronscanapi.com/api".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Verification rule for one canonical currency.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurrencyRule {
    /// Currency symbol (normalized to uppercase on lookup).
    pub symbol: String,

    /// Confirmations required before a payment counts as confirmed.
    #[serde(default = "default_min_confirmations")]
    pub min_confirmations: u64,

    /// Accepted shortfall below the expected amount (fees deducted by the sender).
    #[serde(default)]
    pub tolerance_under: Decimal,

    /// Accepted excess above the expected amount (source rounding, overpayment).
    #[serde(default)]
    pub tolerance_over: Decimal,

    /// ERC-20 contract address when this currency is a token on Ethereum.
    #[serde(default)]
    pub eth_contract: Option<String>,

    /// TRC-20 contract address when this currency is a token on Tron.
    #[serde(default)]
    pub tron_contract: Option<String>,
}

fn default_min_confirmations() -> u64 {
    DEFAULT_MIN_CONFIRMATIONS
}

/// Built-in rules for the currencies the product accepts out of the box.
///
/// Operators override these by listing `[[currencies]]` entries in the
/// config file.
pub fn default_currency_rules() -> Vec<CurrencyRule> {
    vec![
        CurrencyRule {
            symbol: "BTC".to_string(),
            min_confirmations: 2,
            tolerance_under: Decimal::new(1, 4),
            tolerance_over: Decimal::new(1, 4),
            eth_contract: None,
            tron_contract: None,
        },
        CurrencyRule {
            symbol: "LTC".to_string(),
            min_confirmations: 6,
            tolerance_under: Decimal::new(1, 3),
            tolerance_over: Decimal::new(1, 3),
            eth_contract: None,
            tron_contract: None,
        },
        CurrencyRule {
            symbol: "ETH".to_string(),
            min_confirmations: 12,
            tolerance_under: Decimal::new(5, 4),
            tolerance_over: Decimal::new(5, 4),
            eth_contract: None,
            tron_contract: None,
        },
        CurrencyRule {
            symbol: "USDT".to_string(),
            min_confirmations: 20,
            tolerance_under: Decimal::new(5, 2),
            tolerance_over: Decimal::new(5, 2),
            eth_contract: Some("0xdac17f958d2ee523a2206206994597c13d831ec7".to_string()),
            tron_contract: Some("TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t".to_string()),
        },
    ]
}

/// Immutable lookup table over currency rules, keyed by canonical symbol.
///
/// Built once at startup and shared read-only; the core never mutates
/// currency configuration after construction.
#[derive(Debug, Default)]
pub struct CurrencyTable {
    rules: HashMap<String, CurrencyRule>,
}

impl CurrencyTable {
    pub fn from_rules(rules: &[CurrencyRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| {
                let key = CanonicalCurrency::normalize(&rule.symbol).as_str().to_string();
                (key, rule.clone())
            })
            .collect();
        Self { rules }
    }

    pub fn rule(&self, currency: &CanonicalCurrency) -> Option<&CurrencyRule> {
        self.rules.get(currency.as_str())
    }

    /// Confirmation threshold for a currency, falling back to the default.
    pub fn min_confirmations(&self, currency: &CanonicalCurrency) -> u64 {
        self.rule(currency)
            .map(|rule| rule.min_confirmations)
            .unwrap_or(DEFAULT_MIN_CONFIRMATIONS)
    }

    /// Configured ERC-20 contract for a currency, if any.
    pub fn eth_contract(&self, currency: &CanonicalCurrency) -> Option<&str> {
        self.rule(currency).and_then(|rule| rule.eth_contract.as_deref())
    }

    /// Configured TRC-20 contract for a currency, if any.
    pub fn tron_contract(&self, currency: &CanonicalCurrency) -> Option<&str> {
        self.rule(currency).and_then(|rule| rule.tron_contract.as_deref())
    }
}
