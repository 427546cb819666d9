//! Authenticated symmetric envelopes.
//!
//! [`encrypt`] seals a [`HiddenString`] under an [`EncryptionKey`] and
//! returns a self-describing string. [`decrypt`] reverses it after checking
//! the header, the length, and the MAC, in that order.
//!
//! # Format
//!
//! ```text
//! base64url( header(4) || salt(32) || nonce(24) || ciphertext || mac(64) )
//! ```
//!
//! A fresh random salt feeds the keyed-BLAKE2b split of the master key into
//! an encryption subkey and an authentication subkey. The plaintext is
//! encrypted with `XChaCha20` and the MAC covers everything before it plus
//! the additional data:
//!
//! ```text
//! mac = BLAKE2b-512(auth_key, header || salt || nonce || u64be(len(aad)) || aad || ciphertext)
//! ```
//!
//! Blobs written with the previous version omit the additional data length
//! prefix and are still accepted by [`decrypt`] when the `legacy` feature
//! is enabled.

use crate::core::error::{StrongboxError, StrongboxResult};
use crate::core::header::{resolve, EnvelopeConfig, MAC_SIZE, NONCE_SIZE, SALT_SIZE};
use crate::core::operations::primitives::{
    keyed_hash_512, random_array, split_keys, stream_xor, verify_mac,
};
use crate::core::types::{AuthenticationKey, EncryptionKey, HiddenString};
use crate::core::version::{Encoding, ProtocolVersion, HEADER_SIZE};

/// Encrypts `plaintext` with the current protocol version.
///
/// # Arguments
///
/// * `plaintext` - The secret to encrypt
/// * `key` - The symmetric encryption key
/// * `aad` - Additional data bound to the envelope (not encrypted)
///
/// # Returns
///
/// The base64url-encoded envelope.
///
/// # Errors
///
/// Returns `StrongboxError::CannotPerformOperation` if the system RNG fails.
///
/// # Example
///
/// ```rust
/// use strongbox::core::operations::symmetric;
/// use strongbox::core::types::{EncryptionKey, HiddenString};
///
/// let key = EncryptionKey::from_bytes(&[0x42u8; 32]).expect("32 bytes");
/// let blob = symmetric::encrypt(&HiddenString::from("s3cr3t"), &key, b"user:1")
///     .expect("encrypt");
/// assert!(blob.starts_with("MUIFA"));
///
/// let plaintext = symmetric::decrypt(&blob, &key, b"user:1").expect("decrypt");
/// assert_eq!(plaintext.expose(), b"s3cr3t");
/// ```
pub fn encrypt(
    plaintext: &HiddenString,
    key: &EncryptionKey,
    aad: &[u8],
) -> StrongboxResult<String> {
    let raw = encrypt_raw(plaintext.expose(), key, aad, ProtocolVersion::CURRENT)?;
    Ok(Encoding::Base64Url.encode(&raw))
}

/// Decrypts an envelope produced by [`encrypt`].
///
/// # Errors
///
/// - `StrongboxError::InvalidMessage` if the blob is truncated, malformed
///   or carries an unrecognized header
/// - `StrongboxError::InvalidSignature` if the MAC does not verify, which
///   includes a wrong key and mismatched additional data
pub fn decrypt(blob: &str, key: &EncryptionKey, aad: &[u8]) -> StrongboxResult<HiddenString> {
    let config = resolve(blob)?;
    if blob.len() < config.min_encoded_length() {
        return Err(StrongboxError::InvalidMessage("message is too short"));
    }
    let raw = config.encoding.decode(blob)?;
    decrypt_raw(&raw, key, aad, &config)
}

/// Builds the binary envelope for a given version.
pub(crate) fn encrypt_raw(
    plaintext: &[u8],
    key: &EncryptionKey,
    aad: &[u8],
    version: ProtocolVersion,
) -> StrongboxResult<Vec<u8>> {
    let header = version.header();
    let salt = random_array::<SALT_SIZE>()?;
    let nonce = random_array::<NONCE_SIZE>()?;
    let (encryption_key, auth_key) = split_keys(key.as_bytes(), &salt)?;

    let mut ciphertext = plaintext.to_vec();
    stream_xor(&encryption_key, &nonce, &mut ciphertext);

    let mac = compute_mac(version, &auth_key[..], &header, &salt, &nonce, aad, &ciphertext)?;

    let mut raw = Vec::with_capacity(
        HEADER_SIZE + SALT_SIZE + NONCE_SIZE + ciphertext.len() + MAC_SIZE,
    );
    raw.extend_from_slice(&header);
    raw.extend_from_slice(&salt);
    raw.extend_from_slice(&nonce);
    raw.extend_from_slice(&ciphertext);
    raw.extend_from_slice(&mac);
    Ok(raw)
}

fn decrypt_raw(
    raw: &[u8],
    key: &EncryptionKey,
    aad: &[u8],
    config: &EnvelopeConfig,
) -> StrongboxResult<HiddenString> {
    if raw.len() < config.shortest_ciphertext_length {
        return Err(StrongboxError::InvalidMessage("message is too short"));
    }
    if ProtocolVersion::from_header(raw) != Some(config.version) {
        return Err(StrongboxError::InvalidMessage("unrecognized version header"));
    }

    let (header, rest) = raw.split_at(config.header_len);
    let (salt, rest) = rest.split_at(config.salt_len);
    let (nonce, rest) = rest.split_at(config.nonce_len);
    let (ciphertext, mac) = rest.split_at(rest.len() - config.mac_len);

    let nonce: &[u8; NONCE_SIZE] = nonce
        .try_into()
        .map_err(|_| StrongboxError::InvalidMessage("malformed nonce"))?;

    let (encryption_key, auth_key) = split_keys(key.as_bytes(), salt)?;
    let expected = compute_mac(config.version, &auth_key[..], header, salt, nonce, aad, ciphertext)?;
    if !verify_mac(&expected, mac) {
        return Err(StrongboxError::InvalidSignature);
    }

    let mut plaintext = ciphertext.to_vec();
    stream_xor(&encryption_key, nonce, &mut plaintext);
    Ok(HiddenString::new(plaintext))
}

fn compute_mac(
    version: ProtocolVersion,
    auth_key: &[u8],
    header: &[u8],
    salt: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
) -> StrongboxResult<[u8; MAC_SIZE]> {
    match version {
        ProtocolVersion::V5 => {
            let aad_len = (aad.len() as u64).to_be_bytes();
            keyed_hash_512(auth_key, &[header, salt, nonce, &aad_len, aad, ciphertext])
        }
        ProtocolVersion::V4 => keyed_hash_512(auth_key, &[header, salt, nonce, aad, ciphertext]),
    }
}

/// Computes a hex-encoded 64-byte keyed BLAKE2b MAC of `message`.
///
/// # Errors
///
/// Returns `StrongboxError::CannotPerformOperation` if hashing fails.
pub fn authenticate(message: &[u8], key: &AuthenticationKey) -> StrongboxResult<String> {
    let mac = keyed_hash_512(key.as_bytes(), &[message])?;
    Ok(hex::encode(mac))
}

/// Checks a MAC produced by [`authenticate`].
///
/// # Errors
///
/// Returns `StrongboxError::InvalidMessage` if `mac` is not a hex-encoded
/// 64-byte value.
pub fn verify(message: &[u8], key: &AuthenticationKey, mac: &str) -> StrongboxResult<bool> {
    let received = hex::decode(mac).map_err(|_| StrongboxError::InvalidMessage("malformed MAC"))?;
    if received.len() != MAC_SIZE {
        return Err(StrongboxError::InvalidMessage("malformed MAC"));
    }
    let expected = keyed_hash_512(key.as_bytes(), &[message])?;
    Ok(verify_mac(&expected, &received))
}
