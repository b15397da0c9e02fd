//! Crypto Payment Verification Library

pub mod amount;
pub mod chains;
pub mod config;
pub mod explorer;
pub mod observability;
pub mod request;
pub mod verify;

pub use config::schema::VerifierConfig;
pub use verify::{PaymentVerifier, VerificationRequest, VerificationResult};
