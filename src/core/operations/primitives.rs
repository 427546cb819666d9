//! Thin wrappers over the BLAKE2b, `XChaCha20` and RNG primitives.
//!
//! Every higher-level operation goes through these helpers so that subkeys
//! and intermediate outputs are held in zeroizing buffers and MAC checks
//! are always constant time.

use blake2::digest::consts::{U32, U64};
use blake2::digest::{Digest, FixedOutput, KeyInit, Update};
use blake2::{Blake2b, Blake2bMac};
use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::XChaCha20;
use rand_core::{OsRng, TryRngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::core::error::{StrongboxError, StrongboxResult};
use crate::core::header::{MAC_SIZE, NONCE_SIZE};

type Blake2b32 = Blake2b<U32>;
type Blake2bMac32 = Blake2bMac<U32>;
type Blake2bMac64 = Blake2bMac<U64>;

/// Domain separation string for the per-message encryption subkey.
const ENCRYPTION_KEY_DOMAIN: &[u8] = b"Strongbox|EncryptionKey";

/// Domain separation string for the per-message authentication subkey.
const AUTHENTICATION_KEY_DOMAIN: &[u8] = b"AuthenticationKeyFor_|Strongbox";

/// Length of the derived subkeys.
pub const SUBKEY_SIZE: usize = 32;

#[cfg(test)]
thread_local! {
    static MAC_VERIFICATIONS: core::cell::Cell<usize> = const { core::cell::Cell::new(0) };
}

/// Number of MAC verifications performed on the current thread.
#[cfg(test)]
pub(crate) fn mac_verifications() -> usize {
    MAC_VERIFICATIONS.with(core::cell::Cell::get)
}

/// Fills a fixed-size array from the operating system RNG.
///
/// # Errors
///
/// Returns `StrongboxError::CannotPerformOperation` if the RNG fails.
pub fn random_array<const N: usize>() -> StrongboxResult<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| StrongboxError::CannotPerformOperation)?;
    Ok(bytes)
}

/// Keyed BLAKE2b with a 32-byte output over the concatenation of `parts`.
///
/// # Errors
///
/// Returns `StrongboxError::CannotPerformOperation` if the key is longer
/// than BLAKE2b allows.
pub fn keyed_hash_256(key: &[u8], parts: &[&[u8]]) -> StrongboxResult<Zeroizing<[u8; 32]>> {
    let mut mac = <Blake2bMac32 as KeyInit>::new_from_slice(key)
        .map_err(|_| StrongboxError::CannotPerformOperation)?;
    for part in parts {
        <Blake2bMac32 as Update>::update(&mut mac, part);
    }
    let output = <Blake2bMac32 as FixedOutput>::finalize_fixed(mac);
    let mut digest = Zeroizing::new([0u8; 32]);
    digest.copy_from_slice(&output);
    Ok(digest)
}

/// Keyed BLAKE2b with a 64-byte output over the concatenation of `parts`.
///
/// # Errors
///
/// Returns `StrongboxError::CannotPerformOperation` if the key is longer
/// than BLAKE2b allows.
pub fn keyed_hash_512(key: &[u8], parts: &[&[u8]]) -> StrongboxResult<[u8; MAC_SIZE]> {
    let mut mac = <Blake2bMac64 as KeyInit>::new_from_slice(key)
        .map_err(|_| StrongboxError::CannotPerformOperation)?;
    for part in parts {
        <Blake2bMac64 as Update>::update(&mut mac, part);
    }
    let output = <Blake2bMac64 as FixedOutput>::finalize_fixed(mac);
    let mut digest = [0u8; MAC_SIZE];
    digest.copy_from_slice(&output);
    Ok(digest)
}

/// Unkeyed BLAKE2b-256 over the concatenation of `parts`.
#[must_use]
pub fn hash_256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b32::new();
    for part in parts {
        Digest::update(&mut hasher, part);
    }
    hasher.finalize().into()
}

/// Splits a master key into per-message encryption and authentication
/// subkeys bound to `salt`.
///
/// # Errors
///
/// Returns `StrongboxError::CannotPerformOperation` if hashing fails.
pub fn split_keys(
    key: &[u8],
    salt: &[u8],
) -> StrongboxResult<(Zeroizing<[u8; SUBKEY_SIZE]>, Zeroizing<[u8; SUBKEY_SIZE]>)> {
    let encryption = keyed_hash_256(key, &[ENCRYPTION_KEY_DOMAIN, salt])?;
    let authentication = keyed_hash_256(key, &[AUTHENTICATION_KEY_DOMAIN, salt])?;
    Ok((encryption, authentication))
}

/// Applies the `XChaCha20` keystream in place.
pub fn stream_xor(key: &[u8; SUBKEY_SIZE], nonce: &[u8; NONCE_SIZE], data: &mut [u8]) {
    let mut cipher = XChaCha20::new(key.into(), nonce.into());
    cipher.apply_keystream(data);
}

/// Constant-time MAC comparison.
#[must_use]
pub fn verify_mac(expected: &[u8], received: &[u8]) -> bool {
    #[cfg(test)]
    MAC_VERIFICATIONS.with(|count| count.set(count.get() + 1));

    if expected.len() != received.len() {
        return false;
    }
    expected.ct_eq(received).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_array_differs() -> StrongboxResult<()> {
        let a = random_array::<32>()?;
        let b = random_array::<32>()?;
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn test_split_keys_domain_separated() -> StrongboxResult<()> {
        let key = [0x42u8; 32];
        let (enc, auth) = split_keys(&key, &[1u8; 32])?;
        assert_ne!(*enc, *auth);

        let (enc2, auth2) = split_keys(&key, &[2u8; 32])?;
        assert_ne!(*enc, *enc2);
        assert_ne!(*auth, *auth2);

        let (enc3, _) = split_keys(&key, &[1u8; 32])?;
        assert_eq!(*enc, *enc3);
        Ok(())
    }

    #[test]
    fn test_keyed_hash_depends_on_key() -> StrongboxResult<()> {
        let a = keyed_hash_512(&[1u8; 32], &[b"message"])?;
        let b = keyed_hash_512(&[2u8; 32], &[b"message"])?;
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn test_keyed_hash_parts_concatenate() -> StrongboxResult<()> {
        let whole = keyed_hash_512(&[1u8; 32], &[b"hello world"])?;
        let split = keyed_hash_512(&[1u8; 32], &[b"hello", b" ", b"world"])?;
        assert_eq!(whole, split);
        Ok(())
    }

    #[test]
    fn test_keyed_hash_rejects_oversized_key() {
        assert_eq!(
            keyed_hash_512(&[0u8; 65], &[b"x"]),
            Err(StrongboxError::CannotPerformOperation)
        );
    }

    #[test]
    fn test_hash_256_known_empty() {
        // BLAKE2b-256 of the empty string.
        assert_eq!(
            hex::encode(hash_256(&[])),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn test_stream_xor_roundtrip() {
        let key = [7u8; SUBKEY_SIZE];
        let nonce = [9u8; NONCE_SIZE];
        let mut data = *b"attack at dawn";
        stream_xor(&key, &nonce, &mut data);
        assert_ne!(&data, b"attack at dawn");
        stream_xor(&key, &nonce, &mut data);
        assert_eq!(&data, b"attack at dawn");
    }

    #[test]
    fn test_verify_mac_counts() {
        let before = mac_verifications();
        assert!(verify_mac(&[1, 2, 3], &[1, 2, 3]));
        assert!(!verify_mac(&[1, 2, 3], &[1, 2, 4]));
        assert!(!verify_mac(&[1, 2, 3], &[1, 2]));
        assert_eq!(mac_verifications(), before + 3);
    }
}
