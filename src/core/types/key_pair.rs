//! Secret/public key pairs.
//!
//! A [`KeyPair`] always holds a secret key together with the public key
//! derived from it. Pairs built from two independent keys are checked so
//! that the halves belong together.

use core::fmt::{self, Debug};

use rand_core::{OsRng, TryRngCore};
use zeroize::Zeroizing;

use crate::core::error::{StrongboxError, StrongboxResult};
use crate::core::types::key::{
    AnyKey, EncryptionPublic, EncryptionSecret, Key, KeyRole, SignaturePublic, SignatureSecret,
    KEY_SIZE,
};

/// Roles that form the secret half of a key pair.
pub trait SecretRole: KeyRole {
    /// Role of the matching public key.
    type Public: KeyRole;

    /// Derives the public key deterministically.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidKey` if the secret key is unusable.
    fn derive_public(secret: &Key<Self>) -> StrongboxResult<Key<Self::Public>>;
}

impl SecretRole for SignatureSecret {
    type Public = SignaturePublic;

    fn derive_public(secret: &Key<Self>) -> StrongboxResult<Key<Self::Public>> {
        secret.derive_public_key()
    }
}

impl SecretRole for EncryptionSecret {
    type Public = EncryptionPublic;

    fn derive_public(secret: &Key<Self>) -> StrongboxResult<Key<Self::Public>> {
        secret.derive_public_key()
    }
}

/// An Ed25519 key pair.
pub type SignatureKeyPair = KeyPair<SignatureSecret>;

/// An X25519 key pair.
pub type EncryptionKeyPair = KeyPair<EncryptionSecret>;

/// A secret key and its public key.
///
/// # Example
///
/// ```rust
/// use strongbox::core::types::{AnyKey, KeyKind, SignatureKeyPair};
///
/// let pair = SignatureKeyPair::from_seed(&[7u8; 32]).expect("valid seed");
/// let public = pair.public_key().as_bytes().to_vec();
/// let secret = pair.secret_key().as_bytes().to_vec();
///
/// // Either order works.
/// let rebuilt = SignatureKeyPair::from_keys(
///     AnyKey::new(KeyKind::SignaturePublic, &public).expect("public"),
///     AnyKey::new(KeyKind::SignatureSecret, &secret).expect("secret"),
/// )
/// .expect("matching halves");
/// assert_eq!(rebuilt.public_key(), pair.public_key());
/// ```
pub struct KeyPair<S: SecretRole> {
    secret: Key<S>,
    public: Key<S::Public>,
}

impl<S: SecretRole> KeyPair<S> {
    /// Builds a pair from its secret key.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidKey` if the public key cannot be
    /// derived.
    pub fn from_secret(secret: Key<S>) -> StrongboxResult<Self> {
        let public = S::derive_public(&secret)?;
        Ok(Self { secret, public })
    }

    /// Builds a pair from a single runtime-typed key, which must be the
    /// secret half.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidKey` for symmetric keys, public keys
    /// and secret keys of the other family.
    pub fn from_key(key: AnyKey) -> StrongboxResult<Self> {
        Self::from_secret(Key::<S>::try_from(key)?)
    }

    /// Builds a pair from two runtime-typed keys, in either order.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidKey` unless exactly one key is the
    /// secret key of this family and the other is its matching public key.
    pub fn from_keys(first: AnyKey, second: AnyKey) -> StrongboxResult<Self> {
        let (first_kind, second_kind) = (first.kind(), second.kind());
        if !first_kind.is_asymmetric() || !second_kind.is_asymmetric() {
            return Err(StrongboxError::InvalidKey);
        }
        if first_kind.is_public_key() == second_kind.is_public_key() {
            return Err(StrongboxError::InvalidKey);
        }

        let (secret, public) = if first_kind.is_secret_key() {
            (first, second)
        } else {
            (second, first)
        };
        let secret = Key::<S>::try_from(secret)?;
        let public = Key::<S::Public>::try_from(public)?;

        let derived = S::derive_public(&secret)?;
        if derived != public {
            return Err(StrongboxError::InvalidKey);
        }
        Ok(Self { secret, public })
    }

    /// The secret key.
    #[must_use]
    pub fn secret_key(&self) -> &Key<S> {
        &self.secret
    }

    /// The public key.
    #[must_use]
    pub fn public_key(&self) -> &Key<S::Public> {
        &self.public
    }

    /// Splits the pair into its halves.
    #[must_use]
    pub fn into_keys(self) -> (Key<S>, Key<S::Public>) {
        (self.secret, self.public)
    }
}

impl KeyPair<SignatureSecret> {
    /// Deterministic Ed25519 pair from a 32-byte seed.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidKey` if the key cannot be built.
    pub fn from_seed(seed: &[u8; KEY_SIZE]) -> StrongboxResult<Self> {
        Self::from_secret(Key::<SignatureSecret>::from_seed(seed)?)
    }

    /// Fresh random Ed25519 pair.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::CannotPerformOperation` if the system RNG
    /// fails.
    pub fn generate() -> StrongboxResult<Self> {
        let seed = random_seed()?;
        Self::from_seed(&seed)
    }

    /// Converts both halves to X25519.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidKey` if either half cannot be
    /// converted.
    pub fn to_encryption_key_pair(&self) -> StrongboxResult<EncryptionKeyPair> {
        let secret = self.secret.to_encryption_secret_key()?;
        let public = self.public.to_encryption_public_key()?;
        Ok(KeyPair { secret, public })
    }
}

impl KeyPair<EncryptionSecret> {
    /// Deterministic X25519 pair from 32 bytes of secret material.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidKey` if the key cannot be built.
    pub fn from_seed(seed: &[u8; KEY_SIZE]) -> StrongboxResult<Self> {
        Self::from_secret(Key::from_bytes(seed)?)
    }

    /// Fresh random X25519 pair.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::CannotPerformOperation` if the system RNG
    /// fails.
    pub fn generate() -> StrongboxResult<Self> {
        let seed = random_seed()?;
        Self::from_seed(&seed)
    }
}

fn random_seed() -> StrongboxResult<Zeroizing<[u8; KEY_SIZE]>> {
    let mut seed = Zeroizing::new([0u8; KEY_SIZE]);
    OsRng
        .try_fill_bytes(&mut seed[..])
        .map_err(|_| StrongboxError::CannotPerformOperation)?;
    Ok(seed)
}

impl<S: SecretRole> Debug for KeyPair<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("secret", &self.secret)
            .field("public", &self.public)
            .finish()
    }
}

impl<S: SecretRole> PartialEq for KeyPair<S> {
    fn eq(&self, other: &Self) -> bool {
        self.secret == other.secret
    }
}

impl<S: SecretRole> Eq for KeyPair<S> {}
