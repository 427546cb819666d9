//! Misuse-resistant authenticated encryption and password storage.
//!
//! strongbox composes audited primitives (BLAKE2b, `XChaCha20`, Argon2id,
//! Ed25519, X25519) into a small set of versioned, self-describing
//! operations. Keys carry their role in their type, so an authentication
//! key cannot be passed where an encryption key is expected.
//!
//! # Quick Start
//!
//! ```rust
//! use strongbox::core::operations::{key_factory, symmetric};
//! use strongbox::core::types::HiddenString;
//!
//! let key = key_factory::generate_encryption_key().expect("rng");
//!
//! let blob = symmetric::encrypt(&HiddenString::from("4111 1111 1111 1111"), &key, b"card:7")
//!     .expect("encrypt");
//! assert!(blob.starts_with("MUIFA"));
//!
//! let plaintext = symmetric::decrypt(&blob, &key, b"card:7").expect("decrypt");
//! assert_eq!(plaintext.expose(), b"4111 1111 1111 1111");
//!
//! // Additional data is authenticated.
//! assert!(symmetric::decrypt(&blob, &key, b"card:8").is_err());
//! ```
//!
//! # Envelope Format
//!
//! | Field | Size | Notes |
//! |-------|------|-------|
//! | header | 4 | `31 42 05 00` for the current version |
//! | salt | 32 | per-message subkey salt |
//! | nonce | 24 | `XChaCha20` nonce |
//! | ciphertext | n | |
//! | mac | 64 | keyed BLAKE2b-512 |
//!
//! The whole blob is base64url encoded without padding, so every current
//! envelope starts with `MUIFA`.
//!
//! # Key Types
//!
//! | Type | Use |
//! |------|-----|
//! | [`EncryptionKey`] | symmetric envelopes, password storage |
//! | [`AuthenticationKey`] | symmetric MACs |
//! | [`EncryptionSecretKey`] / [`EncryptionPublicKey`] | X25519 envelopes |
//! | [`SignatureSecretKey`] / [`SignaturePublicKey`] | Ed25519 signatures |
//!
//! # Features
//!
//! - `legacy` (default): decode blobs written with the previous protocol
//!   version or stored hex encoded
//! - `prelude` (default): the [`prelude`] module
//! - `serde`: `Serialize`/`Deserialize` for security levels and Argon2
//!   parameters
//!
//! # Security
//!
//! - Key material and decrypted secrets are zeroized on drop
//! - Debug output redacts secret key material
//! - MACs, headers and keys are compared in constant time
//! - No unsafe code
//!
//! # Modules
//!
//! - [`core`] - Core types and operations
//! - [`prelude`] - Ergonomic imports (requires `prelude` feature)

#![forbid(unsafe_code)]

pub mod core;

#[cfg(feature = "prelude")]
pub mod prelude;

// Re-export commonly used items at crate root
pub use core::error::{StrongboxError, StrongboxResult};
pub use core::operations::password::Password;
pub use core::operations::security::{SecurityLevel, SecurityLevels};
pub use core::types::{
    AnyKey, AuthenticationKey, EncryptionKey, EncryptionKeyPair, EncryptionPublicKey,
    EncryptionSecretKey, HiddenString, KeyKind, SignatureKeyPair, SignaturePublicKey,
    SignatureSecretKey,
};
pub use core::version::{Encoding, ProtocolVersion};
