//! Cryptographic operations.
//!
//! - [`symmetric`] - Authenticated envelopes and MACs under a symmetric key
//! - [`asymmetric`] - X25519 envelopes and Ed25519 signatures
//! - [`password`] - Encrypted Argon2id password storage
//! - [`security`] - Security levels and their Argon2id parameters
//! - [`key_factory`] - Key generation, derivation, export and import
//! - [`primitives`] - BLAKE2b, `XChaCha20` and RNG helpers

pub mod asymmetric;
pub mod key_factory;
pub mod password;
pub mod primitives;
pub mod security;
pub mod symmetric;
