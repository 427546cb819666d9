//! Envelope header resolution.
//!
//! Given an encoded blob, [`resolve`] determines which protocol version and
//! string encoding it uses and returns the [`EnvelopeConfig`] describing its
//! layout:
//!
//! ```text
//! blob := encode( header(4) || salt(32) || nonce(24) || ciphertext || mac(64) )
//! ```
//!
//! Resolution never guesses. A blob is either recognized by its base64url
//! prefix, recognized by a hex-encoded header on the explicit legacy path,
//! or rejected with `StrongboxError::InvalidMessage`.

use subtle::ConstantTimeEq;

use crate::core::error::{StrongboxError, StrongboxResult};
use crate::core::version::{Encoding, ProtocolVersion, HEADER_SIZE, PREFIX_SIZE};

/// Absolute minimum blob length in encoded characters, checked before any
/// parsing. The per-version floor is [`EnvelopeConfig::min_encoded_length`].
pub const MIN_BLOB_LENGTH: usize = 8;

/// Salt size used to derive per-message subkeys.
pub const SALT_SIZE: usize = 32;

/// `XChaCha20` nonce size.
pub const NONCE_SIZE: usize = 24;

/// Keyed BLAKE2b MAC size.
pub const MAC_SIZE: usize = 64;

/// Number of leading characters decoded to read the header. Eight base64url
/// characters or eight hex digits always cover the 4-byte header.
const HEADER_PROBE_LENGTH: usize = 8;

/// Layout of an encoded envelope, resolved per decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeConfig {
    /// Protocol version named by the header.
    pub version: ProtocolVersion,
    /// String encoding of the blob.
    pub encoding: Encoding,
    /// Binary header length.
    pub header_len: usize,
    /// Subkey derivation salt length.
    pub salt_len: usize,
    /// Stream cipher nonce length.
    pub nonce_len: usize,
    /// Authentication tag length.
    pub mac_len: usize,
    /// Length of the smallest valid decoded blob (empty plaintext).
    pub shortest_ciphertext_length: usize,
}

impl EnvelopeConfig {
    /// Returns the layout for a version and encoding.
    #[must_use]
    pub const fn new(version: ProtocolVersion, encoding: Encoding) -> Self {
        // V4 and V5 share the same layout; they differ in how the MAC binds
        // the additional data.
        Self {
            version,
            encoding,
            header_len: HEADER_SIZE,
            salt_len: SALT_SIZE,
            nonce_len: NONCE_SIZE,
            mac_len: MAC_SIZE,
            shortest_ciphertext_length: HEADER_SIZE + SALT_SIZE + NONCE_SIZE + MAC_SIZE,
        }
    }

    /// The layout every encrypt call produces.
    #[must_use]
    pub const fn current() -> Self {
        Self::new(ProtocolVersion::CURRENT, Encoding::Base64Url)
    }

    /// Shortest valid encoded blob length for this encoding.
    #[must_use]
    pub const fn min_encoded_length(&self) -> usize {
        self.encoding.encoded_len(self.shortest_ciphertext_length)
    }

    /// Offset of the ciphertext within the decoded blob.
    #[must_use]
    pub const fn ciphertext_offset(&self) -> usize {
        self.header_len + self.salt_len + self.nonce_len
    }

    /// Whether this blob uses a decode-only version or encoding.
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        !self.version.is_current() || matches!(self.encoding, Encoding::LegacyHex)
    }
}

/// Resolves the envelope layout of an encoded blob.
///
/// # Errors
///
/// Returns `StrongboxError::InvalidMessage` if the blob is shorter than
/// [`MIN_BLOB_LENGTH`], carries neither a recognized base64url prefix nor a
/// recognized hex-encoded header, or names a version that this build
/// cannot decode.
pub fn resolve(blob: &str) -> StrongboxResult<EnvelopeConfig> {
    let bytes = blob.as_bytes();
    if bytes.len() < MIN_BLOB_LENGTH {
        return Err(StrongboxError::InvalidMessage("blob is too short"));
    }

    let prefix = &bytes[..PREFIX_SIZE];
    let current = prefix.ct_eq(ProtocolVersion::V5.prefix().as_bytes());
    let old = prefix.ct_eq(ProtocolVersion::V4.prefix().as_bytes());

    let config = if bool::from(current | old) {
        let version = probe_header(blob, Encoding::Base64Url)?;
        EnvelopeConfig::new(version, Encoding::Base64Url)
    } else {
        resolve_legacy_hex(blob)?
    };

    if config.is_legacy() {
        if !cfg!(feature = "legacy") {
            return Err(StrongboxError::InvalidMessage("unsupported legacy envelope"));
        }
        tracing::debug!(
            version = %config.version,
            encoding = ?config.encoding,
            "resolved legacy envelope header"
        );
    }

    Ok(config)
}

/// Hex compatibility shim. Only a hex string whose first four bytes are a
/// recognized envelope header is accepted.
fn resolve_legacy_hex(blob: &str) -> StrongboxResult<EnvelopeConfig> {
    let version = probe_header(blob, Encoding::LegacyHex)?;
    Ok(EnvelopeConfig::new(version, Encoding::LegacyHex))
}

fn probe_header(blob: &str, encoding: Encoding) -> StrongboxResult<ProtocolVersion> {
    let probe = blob
        .get(..HEADER_PROBE_LENGTH)
        .ok_or(StrongboxError::InvalidMessage("unrecognized version header"))?;
    let head = encoding
        .decode(probe)
        .map_err(|_| StrongboxError::InvalidMessage("unrecognized version header"))?;
    ProtocolVersion::from_header(&head)
        .ok_or(StrongboxError::InvalidMessage("unrecognized version header"))
}
