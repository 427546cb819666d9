//! Ergonomic imports for strongbox.
//!
//! # Usage
//!
//! ```rust
//! use strongbox::prelude::*;
//!
//! let key = generate_encryption_key().expect("rng");
//! let blob = symmetric::encrypt(&HiddenString::from("hello"), &key, b"").expect("encrypt");
//! let plaintext = symmetric::decrypt(&blob, &key, b"").expect("decrypt");
//! assert_eq!(plaintext.expose(), b"hello");
//! ```

mod builders;

pub use builders::SecurityLevelsBuilder;

pub use crate::core::error::{StrongboxError, StrongboxResult};
pub use crate::core::operations::key_factory::{
    export, export_key_pair, generate_authentication_key, generate_encryption_key,
    generate_encryption_key_pair, generate_signature_key_pair, import, import_encryption_key_pair,
    import_signature_key_pair, KeyFactory,
};
pub use crate::core::operations::password::Password;
pub use crate::core::operations::security::{
    Argon2Params, SecurityLevel, SecurityLevels, STANDARD_LEVELS,
};
pub use crate::core::operations::{asymmetric, symmetric};
pub use crate::core::types::{
    AnyKey, AuthenticationKey, EncryptionKey, EncryptionKeyPair, EncryptionPublicKey,
    EncryptionSecretKey, HiddenString, Key, KeyKind, KeyPair, SignatureKeyPair,
    SignaturePublicKey, SignatureSecretKey,
};
