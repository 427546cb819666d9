//! Error types for strongbox operations.
//!
//! This module provides a unified error type for all operations.
//! Error messages are intentionally vague for security-sensitive operations
//! to avoid leaking information that could aid attacks. Reasons attached to
//! [`StrongboxError::InvalidMessage`] are static strings that never contain
//! key material or plaintext.

use thiserror::Error;

/// Errors that can occur when working with strongbox keys and envelopes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrongboxError {
    /// The key material is invalid (wrong size, wrong kind, or an illegal
    /// key pair combination).
    #[error("Invalid key material")]
    InvalidKey,

    /// The encoded blob is malformed, truncated, or uses an unrecognized
    /// version header. This indicates corrupted storage, not a failed
    /// verification.
    #[error("Invalid message: {0}")]
    InvalidMessage(&'static str),

    /// Authentication tag or signature verification failed.
    /// Intentionally vague for security.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The underlying primitive failed for an environmental reason
    /// (RNG failure, resource exhaustion).
    #[error("Cannot perform cryptographic operation")]
    CannotPerformOperation,

    /// The security level label is not one of the known presets.
    #[error("Invalid security level: {0}")]
    InvalidSecurityLevel(String),
}

/// Result type alias for strongbox operations.
pub type StrongboxResult<T> = Result<T, StrongboxError>;
