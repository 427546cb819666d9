//! Protocol version markers and string encodings.
//!
//! Every encoded blob starts with a 4-byte header: the magic bytes
//! `0x31 0x42`, the major version, and a reserved zero byte. Once the blob
//! is base64url-encoded, the first five characters of the string are fixed
//! per version, which lets the resolver classify a blob before decoding it.

use core::fmt::{self, Display};

use base64::prelude::*;
use subtle::ConstantTimeEq;

use crate::core::error::{StrongboxError, StrongboxResult};

/// Length of the binary version header.
pub const HEADER_SIZE: usize = 4;

/// Length of the string prefix that identifies a base64url-encoded version.
pub const PREFIX_SIZE: usize = 5;

/// Magic bytes shared by every envelope header.
pub const MAGIC: [u8; 2] = [0x31, 0x42];

/// Header carried by exported key strings (distinct from envelope headers).
pub const KEY_HEADER: [u8; HEADER_SIZE] = [0x31, 0x40, 0x05, 0x00];

/// Envelope protocol versions.
///
/// Only [`ProtocolVersion::CURRENT`] is ever produced. [`ProtocolVersion::V4`]
/// is recognized for decoding data written by earlier releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// Previous version. Decode-only.
    V4,
    /// Current version.
    V5,
}

impl ProtocolVersion {
    /// The version used for all new encrypt calls.
    pub const CURRENT: Self = Self::V5;

    /// Every recognized version, newest first.
    pub const ALL: [Self; 2] = [Self::V5, Self::V4];

    /// The major version byte.
    #[must_use]
    pub const fn major(self) -> u8 {
        match self {
            Self::V4 => 0x04,
            Self::V5 => 0x05,
        }
    }

    /// The 4-byte binary header.
    #[must_use]
    pub const fn header(self) -> [u8; HEADER_SIZE] {
        [MAGIC[0], MAGIC[1], self.major(), 0x00]
    }

    /// The fixed base64url string prefix of blobs carrying this header.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::V4 => "MUIEA",
            Self::V5 => "MUIFA",
        }
    }

    /// Whether new data is written with this version.
    #[must_use]
    pub const fn is_current(self) -> bool {
        matches!(self, Self::V5)
    }

    /// Classifies a raw header.
    ///
    /// Every recognized header is compared in constant time; `None` means the
    /// header belongs to no known version.
    #[must_use]
    pub fn from_header(header: &[u8]) -> Option<Self> {
        if header.len() < HEADER_SIZE {
            return None;
        }
        let candidate = &header[..HEADER_SIZE];
        let mut found = None;
        for version in Self::ALL {
            if bool::from(candidate.ct_eq(&version.header())) {
                found = Some(version);
            }
        }
        found
    }
}

impl Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.major())
    }
}

/// String encodings an envelope can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Unpadded URL-safe base64. Used for all new data.
    Base64Url,
    /// Lowercase or uppercase hex. Compatibility shim for blobs written
    /// before the base64url prefixes existed; decode-only.
    LegacyHex,
}

impl Encoding {
    /// Encodes raw bytes.
    #[must_use]
    pub fn encode(self, raw: &[u8]) -> String {
        match self {
            Self::Base64Url => BASE64_URL_SAFE_NO_PAD.encode(raw),
            Self::LegacyHex => hex::encode(raw),
        }
    }

    /// Decodes an encoded string.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidMessage` on any invalid character or
    /// length.
    pub fn decode(self, encoded: &str) -> StrongboxResult<Vec<u8>> {
        let decoded = match self {
            Self::Base64Url => BASE64_URL_SAFE_NO_PAD.decode(encoded).ok(),
            Self::LegacyHex => hex::decode(encoded).ok(),
        };
        decoded.ok_or(StrongboxError::InvalidMessage("invalid character encoding"))
    }

    /// Length of the encoded form of `raw_len` bytes.
    #[must_use]
    pub const fn encoded_len(self, raw_len: usize) -> usize {
        match self {
            Self::Base64Url => (raw_len * 4).div_ceil(3),
            Self::LegacyHex => raw_len * 2,
        }
    }
}
