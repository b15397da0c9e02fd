//! Amount handling: base-unit conversion and tolerance matching.
//!
//! # Design Decisions
//! - All amounts are `rust_decimal::Decimal`; floats never touch money
//! - Tolerance bands are per-currency configuration, not a global epsilon
//! - Unit conversion failure is surfaced, never truncated

pub mod tolerance;
pub mod units;

pub use tolerance::{ToleranceBand, ToleranceMatcher};
