//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::VerifierConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<VerifierConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: VerifierConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_minimal_config() {
        let raw = r#"
            [explorers]
            timeout_secs = 5

            [[currencies]]
            symbol = "BTC"
            min_confirmations = 3
            tolerance_under = 0.0002
            tolerance_over = 0.0002
        "#;
        let config: VerifierConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.explorers.timeout_secs, 5);
        // Unspecified explorer fields keep their defaults.
        assert!(config.explorers.utxo_base_url.contains("blockcypher"));
        assert_eq!(config.currencies.len(), 1);
        assert_eq!(config.currencies[0].min_confirmations, 3);
        assert_eq!(config.currencies[0].tolerance_under, Decimal::new(2, 4));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: VerifierConfig = toml::from_str("").unwrap();
        assert_eq!(config.explorers.timeout_secs, 10);
        // Built-in currency rules apply when none are listed.
        assert!(config.currencies.iter().any(|rule| rule.symbol == "USDT"));
        assert!(validate_config(&config).is_ok());
    }
}
