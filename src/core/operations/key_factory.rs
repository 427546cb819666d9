//! Key generation, password-based derivation and key export.
//!
//! Exported keys are hex strings carrying their own header and checksum:
//!
//! ```text
//! hex( key_header(4) || key || BLAKE2b-256(key_header || key) )
//! ```
//!
//! The key header `31 40 05 00` never matches an envelope header, so an
//! exported key cannot be mistaken for an encrypted blob.

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::core::error::{StrongboxError, StrongboxResult};
use crate::core::operations::primitives::{hash_256, random_array};
use crate::core::operations::security::{SecurityLevel, SecurityLevels, STANDARD_LEVELS};
use crate::core::types::{
    AuthenticationKey, EncryptionKey, EncryptionKeyPair, HiddenString, Key, KeyPair, KeyRole,
    SecretRole, SignatureKeyPair, KEY_SIZE,
};
use crate::core::version::{HEADER_SIZE, KEY_HEADER};

/// Salt length required for password-based key derivation.
pub const DERIVATION_SALT_SIZE: usize = 16;

/// Length of the checksum appended to exported keys.
const CHECKSUM_SIZE: usize = 32;

// =============================================================================
// Random generation
// =============================================================================

/// Generates a random symmetric encryption key.
///
/// # Errors
///
/// Returns `StrongboxError::CannotPerformOperation` if the system RNG fails.
pub fn generate_encryption_key() -> StrongboxResult<EncryptionKey> {
    let bytes = Zeroizing::new(random_array::<KEY_SIZE>()?);
    Key::from_bytes(&bytes[..])
}

/// Generates a random symmetric authentication key.
///
/// # Errors
///
/// Returns `StrongboxError::CannotPerformOperation` if the system RNG fails.
pub fn generate_authentication_key() -> StrongboxResult<AuthenticationKey> {
    let bytes = Zeroizing::new(random_array::<KEY_SIZE>()?);
    Key::from_bytes(&bytes[..])
}

/// Generates a random X25519 key pair.
///
/// # Errors
///
/// Returns `StrongboxError::CannotPerformOperation` if the system RNG fails.
pub fn generate_encryption_key_pair() -> StrongboxResult<EncryptionKeyPair> {
    EncryptionKeyPair::generate()
}

/// Generates a random Ed25519 key pair.
///
/// # Errors
///
/// Returns `StrongboxError::CannotPerformOperation` if the system RNG fails.
pub fn generate_signature_key_pair() -> StrongboxResult<SignatureKeyPair> {
    SignatureKeyPair::generate()
}

// =============================================================================
// Password-based derivation
// =============================================================================

/// Derives keys from a password and salt with Argon2id.
///
/// The same password, salt and level always yield the same key.
///
/// # Example
///
/// ```rust,no_run
/// use strongbox::core::operations::key_factory::KeyFactory;
/// use strongbox::core::operations::security::SecurityLevel;
/// use strongbox::core::types::HiddenString;
///
/// let factory = KeyFactory::new();
/// let key = factory
///     .derive_encryption_key(
///         &HiddenString::from("hunter2"),
///         &[0x01u8; 16],
///         SecurityLevel::Interactive,
///     )
///     .expect("derive");
/// assert!(key.is_encryption_key());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct KeyFactory<'a> {
    levels: &'a SecurityLevels,
}

impl KeyFactory<'static> {
    /// Uses [`STANDARD_LEVELS`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            levels: &STANDARD_LEVELS,
        }
    }
}

impl Default for KeyFactory<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> KeyFactory<'a> {
    /// Uses a custom level table.
    #[must_use]
    pub const fn with_levels(levels: &'a SecurityLevels) -> Self {
        Self { levels }
    }

    /// Derives a symmetric encryption key.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::CannotPerformOperation` if Argon2 fails.
    pub fn derive_encryption_key(
        &self,
        password: &HiddenString,
        salt: &[u8; DERIVATION_SALT_SIZE],
        level: SecurityLevel,
    ) -> StrongboxResult<EncryptionKey> {
        let bytes = self.stretch(password, salt, level)?;
        Key::from_bytes(&bytes[..])
    }

    /// Derives a symmetric authentication key.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::CannotPerformOperation` if Argon2 fails.
    pub fn derive_authentication_key(
        &self,
        password: &HiddenString,
        salt: &[u8; DERIVATION_SALT_SIZE],
        level: SecurityLevel,
    ) -> StrongboxResult<AuthenticationKey> {
        let bytes = self.stretch(password, salt, level)?;
        Key::from_bytes(&bytes[..])
    }

    /// Derives an X25519 key pair.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::CannotPerformOperation` if Argon2 fails.
    pub fn derive_encryption_key_pair(
        &self,
        password: &HiddenString,
        salt: &[u8; DERIVATION_SALT_SIZE],
        level: SecurityLevel,
    ) -> StrongboxResult<EncryptionKeyPair> {
        let seed = self.stretch(password, salt, level)?;
        EncryptionKeyPair::from_seed(&seed)
    }

    /// Derives an Ed25519 key pair.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::CannotPerformOperation` if Argon2 fails.
    pub fn derive_signature_key_pair(
        &self,
        password: &HiddenString,
        salt: &[u8; DERIVATION_SALT_SIZE],
        level: SecurityLevel,
    ) -> StrongboxResult<SignatureKeyPair> {
        let seed = self.stretch(password, salt, level)?;
        SignatureKeyPair::from_seed(&seed)
    }

    fn stretch(
        &self,
        password: &HiddenString,
        salt: &[u8; DERIVATION_SALT_SIZE],
        level: SecurityLevel,
    ) -> StrongboxResult<Zeroizing<[u8; KEY_SIZE]>> {
        let argon2 = self.levels.params(level).hasher(Some(KEY_SIZE))?;
        let mut output = Zeroizing::new([0u8; KEY_SIZE]);
        argon2
            .hash_password_into(password.expose(), salt, &mut output[..])
            .map_err(|_| StrongboxError::CannotPerformOperation)?;
        Ok(output)
    }
}

// =============================================================================
// Export / import
// =============================================================================

/// Exports a key as a checksummed hex string.
///
/// # Errors
///
/// Infallible for valid keys; the `Result` is kept for API symmetry with
/// [`import`].
pub fn export<R: KeyRole>(key: &Key<R>) -> StrongboxResult<HiddenString> {
    let mut raw = Zeroizing::new(Vec::with_capacity(
        HEADER_SIZE + key.as_bytes().len() + CHECKSUM_SIZE,
    ));
    raw.extend_from_slice(&KEY_HEADER);
    raw.extend_from_slice(key.as_bytes());
    let checksum = hash_256(&[&raw[..]]);
    raw.extend_from_slice(&checksum);
    Ok(HiddenString::from(hex::encode(raw.as_slice())))
}

/// Imports a key produced by [`export`].
///
/// # Errors
///
/// Returns `StrongboxError::InvalidKey` if the string is not hex, has the
/// wrong length for `R`, or carries a bad header or checksum.
pub fn import<R: KeyRole>(exported: &HiddenString) -> StrongboxResult<Key<R>> {
    let raw = Zeroizing::new(hex::decode(exported.expose()).map_err(|_| StrongboxError::InvalidKey)?);
    if raw.len() != HEADER_SIZE + R::KIND.key_len() + CHECKSUM_SIZE {
        return Err(StrongboxError::InvalidKey);
    }

    let (body, checksum) = raw.split_at(raw.len() - CHECKSUM_SIZE);
    let (header, material) = body.split_at(HEADER_SIZE);
    let header_ok = header.ct_eq(&KEY_HEADER);
    let checksum_ok = checksum.ct_eq(&hash_256(&[body]));
    if !bool::from(header_ok & checksum_ok) {
        return Err(StrongboxError::InvalidKey);
    }
    Key::from_bytes(material)
}

/// Exports a key pair through its secret key.
///
/// # Errors
///
/// See [`export`].
pub fn export_key_pair<S: SecretRole>(pair: &KeyPair<S>) -> StrongboxResult<HiddenString> {
    export(pair.secret_key())
}

/// Imports a key pair exported with [`export_key_pair`].
///
/// # Errors
///
/// See [`import`].
pub fn import_key_pair<S: SecretRole>(exported: &HiddenString) -> StrongboxResult<KeyPair<S>> {
    KeyPair::from_secret(import::<S>(exported)?)
}

/// Imports an Ed25519 key pair.
///
/// # Errors
///
/// See [`import`].
pub fn import_signature_key_pair(exported: &HiddenString) -> StrongboxResult<SignatureKeyPair> {
    import_key_pair(exported)
}

/// Imports an X25519 key pair.
///
/// # Errors
///
/// See [`import`].
pub fn import_encryption_key_pair(exported: &HiddenString) -> StrongboxResult<EncryptionKeyPair> {
    import_key_pair(exported)
}
