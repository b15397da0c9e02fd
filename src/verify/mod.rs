//! Verification orchestration.

pub mod types;
pub mod verifier;

pub use types::{
    DetectedBy, FailureCode, RequestError, VerificationRequest, VerificationResult,
};
pub use verifier::PaymentVerifier;
