//! Request normalization: raw user input to canonical identifiers.
//!
//! # Data Flow
//! ```text
//! free-form reference (hash / explorer URL / pasted text)
//!     → reference.rs (extract canonical tx id)
//! free-form currency + optional chain hint
//!     → currency.rs (CanonicalCurrency + Chain)
//! ```
//!
//! # Design Decisions
//! - Everything here is pure and synchronous; no remote calls
//! - Extraction failure is not an error, it routes to address discovery
//! - Chain resolution is total so the orchestrator never sees "unknown chain"

pub mod currency;
pub mod reference;

pub use currency::{CanonicalCurrency, Chain};
