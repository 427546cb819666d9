//! Typed keys.
//!
//! A key's role is part of its type. `Key<SignatureSecret>` can sign,
//! `Key<SymmetricEncryption>` can encrypt envelopes, and so on; passing the
//! wrong kind of key to an operation does not compile. When the kind is only
//! known at runtime, [`AnyKey`] is the closed sum over all roles.
//!
//! | Alias | Role | Flags | Length |
//! |-------|------|-------|--------|
//! | [`AuthenticationKey`] | [`Authentication`] | symmetric | 32 |
//! | [`EncryptionKey`] | [`SymmetricEncryption`] | symmetric, encryption | 32 |
//! | [`EncryptionSecretKey`] | [`EncryptionSecret`] | asymmetric, encryption, secret | 32 |
//! | [`EncryptionPublicKey`] | [`EncryptionPublic`] | asymmetric, encryption, public | 32 |
//! | [`SignatureSecretKey`] | [`SignatureSecret`] | asymmetric, signing, secret | 64 |
//! | [`SignaturePublicKey`] | [`SignaturePublic`] | asymmetric, signing, public | 32 |

use core::fmt::{self, Debug, Display};
use core::marker::PhantomData;

use ed25519_dalek::{SigningKey, VerifyingKey};
use subtle::ConstantTimeEq;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::core::error::{StrongboxError, StrongboxResult};

/// Length of symmetric keys and X25519 keys.
pub const KEY_SIZE: usize = 32;

/// Length of an Ed25519 secret key (seed followed by the public key).
pub const SIGNATURE_SECRET_KEY_SIZE: usize = 64;

/// The fixed classification of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Symmetric message authentication key.
    Authentication,
    /// Symmetric envelope encryption key.
    SymmetricEncryption,
    /// X25519 secret key.
    EncryptionSecret,
    /// X25519 public key.
    EncryptionPublic,
    /// Ed25519 secret key.
    SignatureSecret,
    /// Ed25519 public key.
    SignaturePublic,
}

impl KeyKind {
    /// Whether the key belongs to a public/secret pair.
    #[must_use]
    pub const fn is_asymmetric(self) -> bool {
        !matches!(self, Self::Authentication | Self::SymmetricEncryption)
    }

    /// Whether the key may be used to encrypt or decrypt.
    #[must_use]
    pub const fn is_encryption_key(self) -> bool {
        matches!(
            self,
            Self::SymmetricEncryption | Self::EncryptionSecret | Self::EncryptionPublic
        )
    }

    /// Whether the key may be used to sign or verify.
    #[must_use]
    pub const fn is_signing_key(self) -> bool {
        matches!(self, Self::SignatureSecret | Self::SignaturePublic)
    }

    /// Whether the key is the public half of a pair.
    #[must_use]
    pub const fn is_public_key(self) -> bool {
        matches!(self, Self::EncryptionPublic | Self::SignaturePublic)
    }

    /// Whether the key is the secret half of a pair.
    #[must_use]
    pub const fn is_secret_key(self) -> bool {
        self.is_asymmetric() && !self.is_public_key()
    }

    /// Raw key length implied by the kind.
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            Self::SignatureSecret => SIGNATURE_SECRET_KEY_SIZE,
            _ => KEY_SIZE,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::SymmetricEncryption => "encryption",
            Self::EncryptionSecret => "encryption-secret",
            Self::EncryptionPublic => "encryption-public",
            Self::SignatureSecret => "signature-secret",
            Self::SignaturePublic => "signature-public",
        }
    }
}

impl Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod private {
    pub trait Sealed {}
}

/// Trait for key role markers.
///
/// This trait is sealed and cannot be implemented outside of this crate.
pub trait KeyRole: private::Sealed + Default + Clone + Copy + Send + Sync + 'static {
    /// The kind every key of this role has.
    const KIND: KeyKind;

    /// Wraps a typed key into [`AnyKey`].
    fn into_any(key: Key<Self>) -> AnyKey;

    /// Unwraps a typed key, handing the key back if the kind differs.
    ///
    /// # Errors
    ///
    /// Returns the original key if it has a different role.
    fn from_any(key: AnyKey) -> Result<Key<Self>, AnyKey>;
}

macro_rules! key_role {
    ($(#[$meta:meta])* $role:ident, $alias:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $role;

        impl private::Sealed for $role {}

        impl KeyRole for $role {
            const KIND: KeyKind = KeyKind::$role;

            fn into_any(key: Key<Self>) -> AnyKey {
                AnyKey::$role(key)
            }

            fn from_any(key: AnyKey) -> Result<Key<Self>, AnyKey> {
                match key {
                    AnyKey::$role(key) => Ok(key),
                    other => Err(other),
                }
            }
        }

        #[doc = concat!("A key with the [`", stringify!($role), "`] role.")]
        pub type $alias = Key<$role>;
    };
}

key_role!(
    /// Role marker for symmetric message authentication keys.
    Authentication,
    AuthenticationKey
);
key_role!(
    /// Role marker for symmetric envelope encryption keys.
    SymmetricEncryption,
    EncryptionKey
);
key_role!(
    /// Role marker for X25519 secret keys.
    EncryptionSecret,
    EncryptionSecretKey
);
key_role!(
    /// Role marker for X25519 public keys.
    EncryptionPublic,
    EncryptionPublicKey
);
key_role!(
    /// Role marker for Ed25519 secret keys.
    SignatureSecret,
    SignatureSecretKey
);
key_role!(
    /// Role marker for Ed25519 public keys.
    SignaturePublic,
    SignaturePublicKey
);

/// Kind-specific checks on material of the right length.
fn validate(kind: KeyKind, bytes: &[u8]) -> StrongboxResult<()> {
    match kind {
        // The trailing public key must match the seed.
        KeyKind::SignatureSecret => signing_key(bytes).map(drop),
        KeyKind::SignaturePublic => {
            if verifying_key(bytes)?.is_weak() {
                return Err(StrongboxError::InvalidKey);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn signing_key(bytes: &[u8]) -> StrongboxResult<SigningKey> {
    let keypair: &[u8; SIGNATURE_SECRET_KEY_SIZE] =
        bytes.try_into().map_err(|_| StrongboxError::InvalidKey)?;
    SigningKey::from_keypair_bytes(keypair).map_err(|_| StrongboxError::InvalidKey)
}

fn verifying_key(bytes: &[u8]) -> StrongboxResult<VerifyingKey> {
    let public: &[u8; KEY_SIZE] = bytes.try_into().map_err(|_| StrongboxError::InvalidKey)?;
    VerifyingKey::from_bytes(public).map_err(|_| StrongboxError::InvalidKey)
}

/// Raw key material with a fixed role.
///
/// # Security
///
/// - Key material is zeroized on drop
/// - Debug output redacts everything but public keys' length
/// - Equality comparison uses constant-time comparison
/// - Keys are immutable; there is no `Clone`
///
/// # Example
///
/// ```rust
/// use strongbox::core::types::{EncryptionKey, KeyKind};
///
/// let key = EncryptionKey::from_bytes(&[0x42u8; 32]).expect("32 bytes");
/// assert_eq!(key.kind(), KeyKind::SymmetricEncryption);
/// assert!(key.is_encryption_key());
/// assert!(!key.is_asymmetric());
///
/// assert!(EncryptionKey::from_bytes(&[0x42u8; 16]).is_err());
/// ```
pub struct Key<R: KeyRole> {
    material: Vec<u8>,
    _role: PhantomData<R>,
}

impl<R: KeyRole> Key<R> {
    /// Builds a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidKey` if the length does not match the
    /// role or the material fails role-specific validation.
    pub fn from_bytes(bytes: &[u8]) -> StrongboxResult<Self> {
        if bytes.len() != R::KIND.key_len() {
            return Err(StrongboxError::InvalidKey);
        }
        validate(R::KIND, bytes)?;
        Ok(Self {
            material: bytes.to_vec(),
            _role: PhantomData,
        })
    }

    /// Returns a reference to the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.material
    }

    /// The key's kind.
    #[must_use]
    pub const fn kind(&self) -> KeyKind {
        R::KIND
    }

    /// See [`KeyKind::is_asymmetric`].
    #[must_use]
    pub const fn is_asymmetric(&self) -> bool {
        R::KIND.is_asymmetric()
    }

    /// See [`KeyKind::is_encryption_key`].
    #[must_use]
    pub const fn is_encryption_key(&self) -> bool {
        R::KIND.is_encryption_key()
    }

    /// See [`KeyKind::is_signing_key`].
    #[must_use]
    pub const fn is_signing_key(&self) -> bool {
        R::KIND.is_signing_key()
    }

    /// See [`KeyKind::is_public_key`].
    #[must_use]
    pub const fn is_public_key(&self) -> bool {
        R::KIND.is_public_key()
    }

    /// Type-erases the key.
    #[must_use]
    pub fn into_any(self) -> AnyKey {
        R::into_any(self)
    }

    pub(crate) fn as_array<const N: usize>(&self) -> StrongboxResult<&[u8; N]> {
        self.material
            .as_slice()
            .try_into()
            .map_err(|_| StrongboxError::InvalidKey)
    }
}

// =============================================================================
// Role-specific operations
// =============================================================================

impl Key<SignatureSecret> {
    /// Deterministically builds an Ed25519 secret key from a 32-byte seed.
    ///
    /// # Errors
    ///
    /// Infallible for well-formed seeds; the `Result` mirrors [`Key::from_bytes`].
    pub fn from_seed(seed: &[u8; KEY_SIZE]) -> StrongboxResult<Self> {
        let signing = SigningKey::from_bytes(seed);
        let keypair = Zeroizing::new(signing.to_keypair_bytes());
        Self::from_bytes(&keypair[..])
    }

    pub(crate) fn signing_key(&self) -> StrongboxResult<SigningKey> {
        signing_key(&self.material)
    }

    /// Derives the Ed25519 public key.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidKey` if the stored material is unusable.
    pub fn derive_public_key(&self) -> StrongboxResult<SignaturePublicKey> {
        let public = self.signing_key()?.verifying_key();
        Key::from_bytes(public.as_bytes())
    }

    /// Converts the Ed25519 secret key into the X25519 secret key for the
    /// same curve point.
    ///
    /// The conversion is deterministic and one-way. It ties the signing and
    /// encryption identities together, so only use it where that link is
    /// wanted.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidKey` if the stored material is unusable.
    pub fn to_encryption_secret_key(&self) -> StrongboxResult<EncryptionSecretKey> {
        let scalar = Zeroizing::new(self.signing_key()?.to_scalar_bytes());
        Key::from_bytes(&scalar[..])
    }
}

impl Key<SignaturePublic> {
    pub(crate) fn verifying_key(&self) -> StrongboxResult<VerifyingKey> {
        verifying_key(&self.material)
    }

    /// Converts the Ed25519 public key into the matching X25519 public key
    /// (Edwards to Montgomery form).
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidKey` if the stored point is invalid.
    pub fn to_encryption_public_key(&self) -> StrongboxResult<EncryptionPublicKey> {
        let montgomery = self.verifying_key()?.to_montgomery();
        Key::from_bytes(&montgomery.to_bytes())
    }
}

impl Key<EncryptionSecret> {
    pub(crate) fn static_secret(&self) -> StrongboxResult<StaticSecret> {
        Ok(StaticSecret::from(*self.as_array::<KEY_SIZE>()?))
    }

    /// Derives the X25519 public key.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidKey` if the stored material is unusable.
    pub fn derive_public_key(&self) -> StrongboxResult<EncryptionPublicKey> {
        let public = PublicKey::from(&self.static_secret()?);
        Key::from_bytes(public.as_bytes())
    }
}

impl Key<EncryptionPublic> {
    pub(crate) fn public_key(&self) -> StrongboxResult<PublicKey> {
        Ok(PublicKey::from(*self.as_array::<KEY_SIZE>()?))
    }
}

// =============================================================================
// Drop (zeroize key material)
// =============================================================================

impl<R: KeyRole> Drop for Key<R> {
    fn drop(&mut self) {
        self.material.zeroize();
    }
}

impl<R: KeyRole> ZeroizeOnDrop for Key<R> {}

// =============================================================================
// AsRef implementations
// =============================================================================

impl<R: KeyRole> AsRef<[u8]> for Key<R> {
    fn as_ref(&self) -> &[u8] {
        &self.material
    }
}

// =============================================================================
// Debug (security: don't expose key material)
// =============================================================================

impl<R: KeyRole> Debug for Key<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Key");
        debug.field("kind", &R::KIND.name());
        if R::KIND.is_public_key() {
            debug.field("key_len", &self.material.len());
        } else {
            debug.field("key", &"[REDACTED]");
        }
        debug.finish()
    }
}

// =============================================================================
// PartialEq (constant-time comparison)
// =============================================================================

impl<R: KeyRole> PartialEq for Key<R> {
    fn eq(&self, other: &Self) -> bool {
        if self.material.len() != other.material.len() {
            return false;
        }
        self.material.ct_eq(&other.material).into()
    }
}

impl<R: KeyRole> Eq for Key<R> {}

// =============================================================================
// AnyKey
// =============================================================================

/// A key whose role is only known at runtime.
#[derive(Debug, PartialEq, Eq)]
pub enum AnyKey {
    /// See [`AuthenticationKey`].
    Authentication(AuthenticationKey),
    /// See [`EncryptionKey`].
    SymmetricEncryption(EncryptionKey),
    /// See [`EncryptionSecretKey`].
    EncryptionSecret(EncryptionSecretKey),
    /// See [`EncryptionPublicKey`].
    EncryptionPublic(EncryptionPublicKey),
    /// See [`SignatureSecretKey`].
    SignatureSecret(SignatureSecretKey),
    /// See [`SignaturePublicKey`].
    SignaturePublic(SignaturePublicKey),
}

impl AnyKey {
    /// Builds a key of the given kind from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidKey` if the bytes are not valid for
    /// `kind`.
    pub fn new(kind: KeyKind, bytes: &[u8]) -> StrongboxResult<Self> {
        Ok(match kind {
            KeyKind::Authentication => Self::Authentication(Key::from_bytes(bytes)?),
            KeyKind::SymmetricEncryption => Self::SymmetricEncryption(Key::from_bytes(bytes)?),
            KeyKind::EncryptionSecret => Self::EncryptionSecret(Key::from_bytes(bytes)?),
            KeyKind::EncryptionPublic => Self::EncryptionPublic(Key::from_bytes(bytes)?),
            KeyKind::SignatureSecret => Self::SignatureSecret(Key::from_bytes(bytes)?),
            KeyKind::SignaturePublic => Self::SignaturePublic(Key::from_bytes(bytes)?),
        })
    }

    /// The key's kind.
    #[must_use]
    pub const fn kind(&self) -> KeyKind {
        match self {
            Self::Authentication(_) => KeyKind::Authentication,
            Self::SymmetricEncryption(_) => KeyKind::SymmetricEncryption,
            Self::EncryptionSecret(_) => KeyKind::EncryptionSecret,
            Self::EncryptionPublic(_) => KeyKind::EncryptionPublic,
            Self::SignatureSecret(_) => KeyKind::SignatureSecret,
            Self::SignaturePublic(_) => KeyKind::SignaturePublic,
        }
    }

    /// Returns a reference to the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Authentication(key) => key.as_bytes(),
            Self::SymmetricEncryption(key) => key.as_bytes(),
            Self::EncryptionSecret(key) => key.as_bytes(),
            Self::EncryptionPublic(key) => key.as_bytes(),
            Self::SignatureSecret(key) => key.as_bytes(),
            Self::SignaturePublic(key) => key.as_bytes(),
        }
    }
}

impl<R: KeyRole> From<Key<R>> for AnyKey {
    fn from(key: Key<R>) -> Self {
        R::into_any(key)
    }
}

impl<R: KeyRole> TryFrom<AnyKey> for Key<R> {
    type Error = StrongboxError;

    fn try_from(key: AnyKey) -> Result<Self, Self::Error> {
        R::from_any(key).map_err(|_| StrongboxError::InvalidKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SEED: [u8; 32] = [
        0x70, 0x71, 0x72, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7a, 0x7b, 0x7c, 0x7d, 0x7e,
        0x7f, 0x80, 0x81, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x8a, 0x8b, 0x8c, 0x8d,
        0x8e, 0x8f,
    ];

    #[test]
    fn test_kind_flags() {
        assert!(!KeyKind::Authentication.is_asymmetric());
        assert!(!KeyKind::Authentication.is_encryption_key());
        assert!(KeyKind::SymmetricEncryption.is_encryption_key());
        assert!(!KeyKind::SymmetricEncryption.is_public_key());
        assert!(!KeyKind::SymmetricEncryption.is_secret_key());

        assert!(KeyKind::EncryptionSecret.is_asymmetric());
        assert!(KeyKind::EncryptionSecret.is_secret_key());
        assert!(KeyKind::EncryptionPublic.is_public_key());

        assert!(KeyKind::SignatureSecret.is_signing_key());
        assert!(KeyKind::SignatureSecret.is_secret_key());
        assert!(!KeyKind::SignatureSecret.is_encryption_key());
        assert!(KeyKind::SignaturePublic.is_public_key());
        assert!(KeyKind::SignaturePublic.is_signing_key());
    }

    #[test]
    fn test_kind_lengths() {
        assert_eq!(KeyKind::SignatureSecret.key_len(), 64);
        assert_eq!(KeyKind::SignaturePublic.key_len(), 32);
        assert_eq!(KeyKind::EncryptionSecret.key_len(), 32);
        assert_eq!(KeyKind::SymmetricEncryption.key_len(), 32);
    }

    #[test]
    fn test_from_bytes_wrong_length() {
        assert_eq!(
            EncryptionKey::from_bytes(&[0u8; 31]),
            Err(StrongboxError::InvalidKey)
        );
        assert_eq!(
            AuthenticationKey::from_bytes(&[0u8; 33]),
            Err(StrongboxError::InvalidKey)
        );
        assert_eq!(
            SignatureSecretKey::from_bytes(&[0u8; 32]),
            Err(StrongboxError::InvalidKey)
        );
    }

    #[test]
    fn test_signature_secret_rejects_mismatched_public_half() -> StrongboxResult<()> {
        let secret = SignatureSecretKey::from_seed(&TEST_SEED)?;
        let mut bytes = secret.as_bytes().to_vec();
        bytes[63] ^= 0x01;
        assert_eq!(
            SignatureSecretKey::from_bytes(&bytes),
            Err(StrongboxError::InvalidKey)
        );
        Ok(())
    }

    #[test]
    fn test_signature_public_rejects_weak_point() {
        // The identity point has small order.
        let mut identity = [0u8; 32];
        identity[0] = 0x01;
        assert_eq!(
            SignaturePublicKey::from_bytes(&identity),
            Err(StrongboxError::InvalidKey)
        );
    }

    #[test]
    fn test_derive_signature_public_key() -> StrongboxResult<()> {
        let secret = SignatureSecretKey::from_seed(&TEST_SEED)?;
        let public = secret.derive_public_key()?;
        assert_eq!(public.as_bytes(), &secret.as_bytes()[32..]);
        Ok(())
    }

    #[test]
    fn test_signing_to_encryption_conversion_agrees() -> StrongboxResult<()> {
        let secret = SignatureSecretKey::from_seed(&TEST_SEED)?;
        let public = secret.derive_public_key()?;

        let enc_secret = secret.to_encryption_secret_key()?;
        let enc_public_from_secret = enc_secret.derive_public_key()?;
        let enc_public_from_public = public.to_encryption_public_key()?;

        assert_eq!(enc_public_from_secret, enc_public_from_public);
        Ok(())
    }

    #[test]
    fn test_conversion_is_deterministic() -> StrongboxResult<()> {
        let a = SignatureSecretKey::from_seed(&TEST_SEED)?.to_encryption_secret_key()?;
        let b = SignatureSecretKey::from_seed(&TEST_SEED)?.to_encryption_secret_key()?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_any_key_roundtrip() -> StrongboxResult<()> {
        let any = AnyKey::new(KeyKind::SymmetricEncryption, &[0x42u8; 32])?;
        assert_eq!(any.kind(), KeyKind::SymmetricEncryption);
        assert_eq!(any.as_bytes(), &[0x42u8; 32]);

        let key = EncryptionKey::try_from(any)?;
        assert_eq!(key.as_bytes(), &[0x42u8; 32]);

        let back: AnyKey = key.into();
        assert_eq!(back.kind(), KeyKind::SymmetricEncryption);
        Ok(())
    }

    #[test]
    fn test_any_key_wrong_role() -> StrongboxResult<()> {
        let any = AnyKey::new(KeyKind::Authentication, &[0x42u8; 32])?;
        assert_eq!(
            EncryptionKey::try_from(any),
            Err(StrongboxError::InvalidKey)
        );
        Ok(())
    }

    #[test]
    fn test_any_key_validates() {
        assert_eq!(
            AnyKey::new(KeyKind::SignatureSecret, &[0u8; 32]),
            Err(StrongboxError::InvalidKey)
        );
    }

    #[test]
    fn test_debug_redacts_key() -> StrongboxResult<()> {
        let key = EncryptionKey::from_bytes(&[0x70u8; 32])?;
        let debug_str = format!("{key:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("70"));

        let public = SignatureSecretKey::from_seed(&TEST_SEED)?.derive_public_key()?;
        let debug_str = format!("{public:?}");
        assert!(debug_str.contains("key_len"));
        Ok(())
    }

    #[test]
    fn test_equality() -> StrongboxResult<()> {
        let a = EncryptionKey::from_bytes(&[1u8; 32])?;
        let b = EncryptionKey::from_bytes(&[1u8; 32])?;
        let c = EncryptionKey::from_bytes(&[2u8; 32])?;
        assert_eq!(a, b);
        assert_ne!(a, c);
        Ok(())
    }

    #[test]
    fn test_keys_zeroize_on_drop() {
        fn assert_zeroize_on_drop<T: ZeroizeOnDrop>() {}
        assert_zeroize_on_drop::<EncryptionKey>();
        assert_zeroize_on_drop::<AuthenticationKey>();
        assert_zeroize_on_drop::<SignatureSecretKey>();
        assert_zeroize_on_drop::<EncryptionSecretKey>();
    }
}
