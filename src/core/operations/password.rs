//! Encrypted password storage.
//!
//! A stored password is an Argon2id PHC string sealed in a symmetric
//! envelope. Knowing the database contents alone is not enough to run an
//! offline guessing attack; the encryption key is needed as well.
//!
//! ```text
//! stored = symmetric::encrypt("$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>", key, aad)
//! ```

use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::error::{StrongboxError, StrongboxResult};
use crate::core::operations::primitives::random_array;
use crate::core::operations::security::{SecurityLevel, SecurityLevels, STANDARD_LEVELS};
use crate::core::operations::symmetric;
use crate::core::types::{EncryptionKey, HiddenString};

/// Length of the random Argon2 salt.
pub const PASSWORD_SALT_SIZE: usize = 16;

/// Algorithm tag every supported PHC string starts with.
const ARGON2ID_TAG: &[u8] = b"$argon2id$";

/// Password hashing façade bound to a security level table.
///
/// # Example
///
/// ```rust,no_run
/// use strongbox::core::operations::password::Password;
/// use strongbox::core::operations::security::SecurityLevel;
/// use strongbox::core::types::{EncryptionKey, HiddenString};
///
/// let key = EncryptionKey::from_bytes(&[0x42u8; 32]).expect("32 bytes");
/// let password = Password::new();
///
/// let stored = password
///     .hash(&HiddenString::from("hunter2"), &key, SecurityLevel::Interactive, b"")
///     .expect("hash");
/// assert!(password
///     .verify(&HiddenString::from("hunter2"), &stored, &key, b"")
///     .expect("verify"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Password<'a> {
    levels: &'a SecurityLevels,
}

impl Password<'static> {
    /// Uses [`STANDARD_LEVELS`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            levels: &STANDARD_LEVELS,
        }
    }
}

impl Default for Password<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Password<'a> {
    /// Uses a custom level table.
    #[must_use]
    pub const fn with_levels(levels: &'a SecurityLevels) -> Self {
        Self { levels }
    }

    /// The level table in use.
    #[must_use]
    pub const fn levels(&self) -> &'a SecurityLevels {
        self.levels
    }

    /// Hashes `password` with Argon2id at `level` and encrypts the result.
    ///
    /// # Arguments
    ///
    /// * `password` - The password to hash
    /// * `key` - The key the stored hash is encrypted under
    /// * `level` - The cost preset
    /// * `aad` - Additional data bound to the stored hash
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::CannotPerformOperation` if the RNG fails or
    /// Argon2 rejects the parameters.
    pub fn hash(
        &self,
        password: &HiddenString,
        key: &EncryptionKey,
        level: SecurityLevel,
        aad: &[u8],
    ) -> StrongboxResult<String> {
        let hasher = self.levels.params(level).hasher(None)?;
        let salt_bytes = random_array::<PASSWORD_SALT_SIZE>()?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|_| StrongboxError::CannotPerformOperation)?;
        let phc = Zeroizing::new(
            hasher
                .hash_password(password.expose(), &salt)
                .map_err(|_| StrongboxError::CannotPerformOperation)?
                .to_string(),
        );
        symmetric::encrypt(&HiddenString::from(phc.as_bytes()), key, aad)
    }

    /// Checks `password` against a value produced by [`Password::hash`].
    ///
    /// # Returns
    ///
    /// `Ok(false)` only when the stored hash is well formed and the password
    /// is wrong.
    ///
    /// # Errors
    ///
    /// - `StrongboxError::InvalidMessage` if `stored` or the hash inside it
    ///   is malformed
    /// - `StrongboxError::InvalidSignature` if `stored` was not produced
    ///   with this key and additional data
    pub fn verify(
        &self,
        password: &HiddenString,
        stored: &str,
        key: &EncryptionKey,
        aad: &[u8],
    ) -> StrongboxResult<bool> {
        let phc = symmetric::decrypt(stored, key, aad)?;
        let phc = phc.expose_str()?;
        let parsed = PasswordHash::new(phc)
            .map_err(|_| StrongboxError::InvalidMessage("malformed password hash"))?;

        // Cost parameters come from the hash itself, not the level table.
        match Argon2::default().verify_password(password.expose(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(_) => Err(StrongboxError::InvalidMessage("malformed password hash")),
        }
    }

    /// Whether a stored hash was made with something other than Argon2id at
    /// `level`.
    ///
    /// # Errors
    ///
    /// Same as [`Password::verify`] for the decryption step.
    pub fn needs_rehash(
        &self,
        stored: &str,
        key: &EncryptionKey,
        level: SecurityLevel,
        aad: &[u8],
    ) -> StrongboxResult<bool> {
        let phc = symmetric::decrypt(stored, key, aad)?;
        let phc = phc.expose();

        let tag = phc.get(..ARGON2ID_TAG.len()).unwrap_or_default();
        if !bool::from(tag.ct_eq(ARGON2ID_TAG)) {
            debug!(%level, "stored hash is not argon2id, rehash required");
            return Ok(true);
        }

        let expected = self.levels.params(level).phc_prefix();
        let actual = phc.get(..expected.len()).unwrap_or_default();
        if bool::from(actual.ct_eq(expected.as_bytes())) {
            return Ok(false);
        }
        debug!(%level, "stored hash parameters differ, rehash required");
        Ok(true)
    }
}
