//! `HiddenString` - guarded buffer for passwords, plaintexts and exported keys.

use core::fmt::{self, Debug};

use secrecy::{ExposeSecret, SecretSlice};
use subtle::ConstantTimeEq;

use crate::core::error::{StrongboxError, StrongboxResult};

/// A sensitive byte buffer.
///
/// # Security
///
/// - Contents are zeroized when the value is dropped, on every exit path
/// - Debug output redacts the contents
/// - No `Clone`, `Copy` or `Display`; copies are made only through
///   [`HiddenString::duplicate`]
/// - Equality comparison uses constant-time comparison
///
/// # Example
///
/// ```rust
/// use strongbox::core::types::HiddenString;
///
/// let password = HiddenString::from("correct horse battery staple");
/// assert_eq!(password.len(), 28);
/// assert_eq!(format!("{password:?}"), "HiddenString([REDACTED])");
/// ```
pub struct HiddenString {
    inner: SecretSlice<u8>,
}

impl HiddenString {
    /// Takes ownership of `bytes`.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            inner: SecretSlice::from(bytes),
        }
    }

    /// Returns the guarded bytes.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Returns the guarded bytes as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidMessage` if the contents are not UTF-8.
    pub fn expose_str(&self) -> StrongboxResult<&str> {
        core::str::from_utf8(self.expose())
            .map_err(|_| StrongboxError::InvalidMessage("guarded buffer is not UTF-8"))
    }

    /// Number of guarded bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expose().len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }

    /// Makes an independent copy.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self::new(self.expose().to_vec())
    }
}

impl From<Vec<u8>> for HiddenString {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<String> for HiddenString {
    fn from(string: String) -> Self {
        Self::new(string.into_bytes())
    }
}

impl From<&str> for HiddenString {
    fn from(string: &str) -> Self {
        Self::new(string.as_bytes())
    }
}

impl From<&[u8]> for HiddenString {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl Debug for HiddenString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HiddenString([REDACTED])")
    }
}

impl PartialEq for HiddenString {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.expose(), other.expose());
        if a.len() != b.len() {
            return false;
        }
        a.ct_eq(b).into()
    }
}

impl Eq for HiddenString {}
