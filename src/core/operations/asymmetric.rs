//! Public-key envelopes and signatures.
//!
//! - [`encrypt`]/[`decrypt`] run the symmetric envelope under an X25519
//!   shared key
//! - [`sign`]/[`verify`] produce and check detached Ed25519 signatures
//! - [`sign_and_encrypt`]/[`verify_and_decrypt`] combine the two, using the
//!   sender's signing key converted to X25519

use base64::prelude::*;
use ed25519_dalek::{Signature, Signer, SIGNATURE_LENGTH};
use zeroize::Zeroizing;

use crate::core::error::{StrongboxError, StrongboxResult};
use crate::core::operations::primitives::hash_256;
use crate::core::operations::symmetric;
use crate::core::types::{
    EncryptionKey, EncryptionPublicKey, EncryptionSecretKey, HiddenString, SignaturePublicKey,
    SignatureSecretKey,
};

/// Domain separation string for hashing the raw X25519 output.
const SHARED_KEY_DOMAIN: &[u8] = b"Strongbox|SharedEncryptionKey";

/// Computes the symmetric key shared between two X25519 parties.
///
/// Both `shared_secret(a_secret, b_public)` and
/// `shared_secret(b_secret, a_public)` yield the same key.
///
/// # Errors
///
/// Returns `StrongboxError::InvalidKey` if the public key is a low-order
/// point, which would make the shared secret predictable.
pub fn shared_secret(
    our_secret: &EncryptionSecretKey,
    their_public: &EncryptionPublicKey,
) -> StrongboxResult<EncryptionKey> {
    let shared = our_secret
        .static_secret()?
        .diffie_hellman(&their_public.public_key()?);
    if !shared.was_contributory() {
        return Err(StrongboxError::InvalidKey);
    }
    let key = Zeroizing::new(hash_256(&[SHARED_KEY_DOMAIN, &shared.as_bytes()[..]]));
    EncryptionKey::from_bytes(&key[..])
}

/// Encrypts `plaintext` for the holder of `their_public`'s secret key.
///
/// # Errors
///
/// See [`shared_secret`] and [`symmetric::encrypt`].
pub fn encrypt(
    plaintext: &HiddenString,
    our_secret: &EncryptionSecretKey,
    their_public: &EncryptionPublicKey,
    aad: &[u8],
) -> StrongboxResult<String> {
    let key = shared_secret(our_secret, their_public)?;
    symmetric::encrypt(plaintext, &key, aad)
}

/// Decrypts an envelope produced by [`encrypt`].
///
/// # Errors
///
/// See [`shared_secret`] and [`symmetric::decrypt`].
pub fn decrypt(
    blob: &str,
    our_secret: &EncryptionSecretKey,
    their_public: &EncryptionPublicKey,
    aad: &[u8],
) -> StrongboxResult<HiddenString> {
    let key = shared_secret(our_secret, their_public)?;
    symmetric::decrypt(blob, &key, aad)
}

/// Signs `message`, returning the base64url-encoded Ed25519 signature.
///
/// # Errors
///
/// Returns `StrongboxError::InvalidKey` if the secret key is unusable.
pub fn sign(message: &[u8], secret: &SignatureSecretKey) -> StrongboxResult<String> {
    let signature = secret.signing_key()?.sign(message);
    Ok(BASE64_URL_SAFE_NO_PAD.encode(signature.to_bytes()))
}

/// Checks a signature produced by [`sign`].
///
/// Uses strict verification, which rejects non-canonical signatures.
///
/// # Errors
///
/// Returns `StrongboxError::InvalidMessage` if `signature` is not a
/// base64url-encoded 64-byte value.
pub fn verify(
    message: &[u8],
    public: &SignaturePublicKey,
    signature: &str,
) -> StrongboxResult<bool> {
    let bytes = BASE64_URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| StrongboxError::InvalidMessage("malformed signature"))?;
    let signature = Signature::from_slice(&bytes)
        .map_err(|_| StrongboxError::InvalidMessage("malformed signature"))?;
    verify_detached(message, public, &signature)
}

fn verify_detached(
    message: &[u8],
    public: &SignaturePublicKey,
    signature: &Signature,
) -> StrongboxResult<bool> {
    Ok(public
        .verifying_key()?
        .verify_strict(message, signature)
        .is_ok())
}

/// Signs `message` and encrypts `signature || message` for a recipient.
///
/// The envelope is keyed by the X25519 form of the sender's signing key
/// and bound to the sender's public signing key as additional data.
///
/// # Errors
///
/// See [`sign`] and [`encrypt`].
pub fn sign_and_encrypt(
    message: &HiddenString,
    sender: &SignatureSecretKey,
    recipient: &EncryptionPublicKey,
) -> StrongboxResult<String> {
    let signature = sender.signing_key()?.sign(message.expose());

    let mut payload = Vec::with_capacity(SIGNATURE_LENGTH + message.len());
    payload.extend_from_slice(&signature.to_bytes());
    payload.extend_from_slice(message.expose());
    let payload = HiddenString::new(payload);

    let sender_public = sender.derive_public_key()?;
    let our_secret = sender.to_encryption_secret_key()?;
    let key = shared_secret(&our_secret, recipient)?;
    symmetric::encrypt(&payload, &key, sender_public.as_bytes())
}

/// Reverses [`sign_and_encrypt`].
///
/// # Errors
///
/// - `StrongboxError::InvalidSignature` if the envelope MAC or the inner
///   signature does not verify
/// - `StrongboxError::InvalidMessage` if the blob or payload is malformed
pub fn verify_and_decrypt(
    blob: &str,
    sender: &SignaturePublicKey,
    recipient: &EncryptionSecretKey,
) -> StrongboxResult<HiddenString> {
    let their_public = sender.to_encryption_public_key()?;
    let key = shared_secret(recipient, &their_public)?;
    let payload = symmetric::decrypt(blob, &key, sender.as_bytes())?;

    let (signature, message) = payload
        .expose()
        .split_at_checked(SIGNATURE_LENGTH)
        .ok_or(StrongboxError::InvalidMessage("payload is too short"))?;
    let signature = Signature::from_slice(signature)
        .map_err(|_| StrongboxError::InvalidMessage("malformed signature"))?;
    if !verify_detached(message, sender, &signature)? {
        return Err(StrongboxError::InvalidSignature);
    }
    Ok(HiddenString::new(message))
}
