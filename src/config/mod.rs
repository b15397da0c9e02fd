//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → VerifierConfig (validated, immutable)
//!     → shared via Arc to the verifier
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the verifier is rebuilt to change it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{default_currency_rules, CurrencyRule, CurrencyTable, VerifierConfig};
