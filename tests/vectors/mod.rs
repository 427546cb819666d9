//! Test vector types for the fixed strongbox vectors.
//!
//! The vectors were produced by an independent implementation of the
//! envelope and key export formats and pin the wire format.

// Some fields are only read by a subset of the tests
#![allow(dead_code)]

use serde::Deserialize;

/// Envelope vector suite (`envelopes.json`).
#[derive(Debug, Deserialize)]
pub struct EnvelopeSuite {
    pub name: String,
    pub tests: Vec<EnvelopeVector>,
}

/// A single encrypted blob with everything needed to open it.
#[derive(Debug, Deserialize)]
pub struct EnvelopeVector {
    pub name: String,
    /// Major protocol version in the header
    pub version: u8,
    /// `base64url` or `hex`
    pub encoding: String,
    /// Hex-encoded 32-byte encryption key
    pub key: String,
    pub aad: String,
    pub plaintext: String,
    pub blob: String,
}

impl EnvelopeVector {
    pub fn is_legacy(&self) -> bool {
        self.version != 5 || self.encoding != "base64url"
    }
}

/// Key vector suite (`keys.json`).
#[derive(Debug, Deserialize)]
pub struct KeySuite {
    pub name: String,
    pub exports: Vec<ExportVector>,
    pub macs: Vec<MacVector>,
}

/// A raw key and its exported form.
#[derive(Debug, Deserialize)]
pub struct ExportVector {
    pub name: String,
    /// `encryption` or `authentication`
    pub kind: String,
    pub key: String,
    pub exported: String,
}

/// A keyed BLAKE2b-512 MAC.
#[derive(Debug, Deserialize)]
pub struct MacVector {
    pub name: String,
    pub key: String,
    pub message: String,
    pub mac: String,
}
