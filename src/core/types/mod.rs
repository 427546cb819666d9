//! Key and secret buffer types.
//!
//! - [`HiddenString`] - Guarded buffer for passwords and plaintexts
//! - [`Key`] - Raw key material with a fixed role
//! - [`AnyKey`] - A key whose role is known only at runtime
//! - [`KeyPair`] - A secret key with its derived public key

mod hidden;
mod key;
mod key_pair;

pub use hidden::HiddenString;
pub use key::{
    AnyKey, Authentication, AuthenticationKey, EncryptionKey, EncryptionPublic,
    EncryptionPublicKey, EncryptionSecret, EncryptionSecretKey, Key, KeyKind, KeyRole,
    SignaturePublic, SignaturePublicKey, SignatureSecret, SignatureSecretKey,
    SymmetricEncryption, KEY_SIZE, SIGNATURE_SECRET_KEY_SIZE,
};
pub use key_pair::{EncryptionKeyPair, KeyPair, SecretRole, SignatureKeyPair};
