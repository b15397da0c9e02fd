//! Observability helpers.
//!
//! # Design Decisions
//! - Log events are emitted through `tracing` at call sites; this module
//!   only holds the shared helpers (address masking)
//! - Metrics are counters behind the `metrics` facade; whether anything
//!   listens is the embedding process's choice
//! - Addresses are always masked before logging

pub mod logging;
pub mod metrics;
