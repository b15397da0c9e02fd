//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check explorer URLs actually parse
//! - Validate value ranges (timeouts > 0, tolerances non-negative)
//! - Detect duplicate currency rules
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the config
//! - Runs before a config is accepted into the system

use std::collections::HashSet;

use alloy::primitives::Address;
use thiserror::Error;
use url::Url;

use crate::config::schema::VerifierConfig;
use crate::request::currency::CanonicalCurrency;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid {field}: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("explorer timeout must be greater than zero")]
    ZeroTimeout,

    #[error("currency rule #{index} has an empty symbol")]
    EmptySymbol { index: usize },

    #[error("duplicate currency rule for {symbol}")]
    DuplicateSymbol { symbol: String },

    #[error("currency {symbol}: tolerance must not be negative")]
    NegativeTolerance { symbol: String },

    #[error("currency {symbol}: invalid ERC-20 contract address: {reason}")]
    InvalidEthContract { symbol: String, reason: String },

    #[error("currency {symbol}: invalid TRC-20 contract address")]
    InvalidTronContract { symbol: String },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &VerifierConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let urls = [
        ("explorers.utxo_base_url", &config.explorers.utxo_base_url),
        ("explorers.evm_base_url", &config.explorers.evm_base_url),
        ("explorers.tron_base_url", &config.explorers.tron_base_url),
    ];
    for (field, value) in urls {
        if let Err(e) = Url::parse(value) {
            errors.push(ValidationError::InvalidUrl {
                field,
                reason: e.to_string(),
            });
        }
    }

    if config.explorers.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let mut seen = HashSet::new();
    for (index, rule) in config.currencies.iter().enumerate() {
        let symbol = CanonicalCurrency::normalize(&rule.symbol);
        if symbol.as_str().is_empty() {
            errors.push(ValidationError::EmptySymbol { index });
            continue;
        }
        if !seen.insert(symbol.as_str().to_string()) {
            errors.push(ValidationError::DuplicateSymbol {
                symbol: symbol.as_str().to_string(),
            });
        }
        if rule.tolerance_under.is_sign_negative() || rule.tolerance_over.is_sign_negative() {
            errors.push(ValidationError::NegativeTolerance {
                symbol: symbol.as_str().to_string(),
            });
        }
        if let Some(contract) = &rule.eth_contract {
            if let Err(e) = contract.parse::<Address>() {
                errors.push(ValidationError::InvalidEthContract {
                    symbol: symbol.as_str().to_string(),
                    reason: e.to_string(),
                });
            }
        }
        if let Some(contract) = &rule.tron_contract {
            // Base58check Tron addresses are 34 chars and start with T.
            if contract.len() != 34 || !contract.starts_with('T') {
                errors.push(ValidationError::InvalidTronContract {
                    symbol: symbol.as_str().to_string(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::CurrencyRule;
    use rust_decimal::Decimal;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&VerifierConfig::default()).is_ok());
    }

    #[test]
    fn test_bad_url_rejected() {
        let mut config = VerifierConfig::default();
        config.explorers.evm_base_url = "not a url".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("evm_base_url"));
    }

    #[test]
    fn test_collects_multiple_errors() {
        let mut config = VerifierConfig {
            currencies: vec![
                CurrencyRule {
                    symbol: "BTC".to_string(),
                    min_confirmations: 2,
                    tolerance_under: Decimal::new(-1, 4),
                    tolerance_over: Decimal::ZERO,
                    eth_contract: None,
                    tron_contract: None,
                },
                CurrencyRule {
                    symbol: "btc".to_string(),
                    min_confirmations: 2,
                    tolerance_under: Decimal::ZERO,
                    tolerance_over: Decimal::ZERO,
                    eth_contract: None,
                    tron_contract: None,
                },
            ],
            ..Default::default()
        };
        config.explorers.timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_contract_addresses_checked() {
        let config = VerifierConfig {
            currencies: vec![CurrencyRule {
                symbol: "USDT".to_string(),
                min_confirmations: 20,
                tolerance_under: Decimal::ZERO,
                tolerance_over: Decimal::ZERO,
                eth_contract: Some("0x1234".to_string()),
                tron_contract: Some("not-a-tron-address".to_string()),
            }],
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
