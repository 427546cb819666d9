//! Integration tests using the fixed strongbox test vectors.
//!
//! These pin the envelope wire format (both protocol versions and both
//! string encodings), the key export format and the MAC construction.

// Test code legitimately uses panic patterns for test failure reporting
#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

mod vectors;

use std::path::PathBuf;

use strongbox::core::header::resolve;
use strongbox::core::operations::{key_factory, symmetric};
use strongbox::core::types::{
    Authentication, AuthenticationKey, EncryptionKey, HiddenString, SymmetricEncryption,
};
use strongbox::{Encoding, ProtocolVersion, StrongboxError};
use vectors::*;

/// Get the path to the test vectors directory.
fn vectors_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/vectors")
}

fn load<T: serde::de::DeserializeOwned>(file: &str) -> T {
    let path = vectors_dir().join(file);
    let json = std::fs::read_to_string(&path).expect("read vectors");
    serde_json::from_str(&json).expect("parse vectors")
}

fn key_from_hex(hex_key: &str) -> EncryptionKey {
    EncryptionKey::from_bytes(&hex::decode(hex_key).expect("hex key")).expect("valid key")
}

// =============================================================================
// Envelopes
// =============================================================================

#[test]
fn test_envelope_vectors_decrypt() {
    let suite: EnvelopeSuite = load("envelopes.json");
    assert!(!suite.tests.is_empty());

    for vector in &suite.tests {
        if vector.is_legacy() && !cfg!(feature = "legacy") {
            continue;
        }
        let key = key_from_hex(&vector.key);
        let plaintext = symmetric::decrypt(&vector.blob, &key, vector.aad.as_bytes())
            .unwrap_or_else(|e| panic!("{}: {e}", vector.name));
        assert_eq!(
            plaintext.expose(),
            vector.plaintext.as_bytes(),
            "{}",
            vector.name
        );
    }
}

#[test]
fn test_envelope_vectors_resolve() {
    let suite: EnvelopeSuite = load("envelopes.json");

    for vector in &suite.tests {
        let result = resolve(&vector.blob);
        if vector.is_legacy() && !cfg!(feature = "legacy") {
            assert!(
                matches!(result, Err(StrongboxError::InvalidMessage(_))),
                "{}",
                vector.name
            );
            continue;
        }

        let config = result.unwrap_or_else(|e| panic!("{}: {e}", vector.name));
        let expected_version = match vector.version {
            4 => ProtocolVersion::V4,
            5 => ProtocolVersion::V5,
            other => panic!("unexpected version {other}"),
        };
        let expected_encoding = match vector.encoding.as_str() {
            "base64url" => Encoding::Base64Url,
            "hex" => Encoding::LegacyHex,
            other => panic!("unexpected encoding {other}"),
        };
        assert_eq!(config.version, expected_version, "{}", vector.name);
        assert_eq!(config.encoding, expected_encoding, "{}", vector.name);
    }
}

#[test]
fn test_envelope_vectors_bind_aad() {
    let suite: EnvelopeSuite = load("envelopes.json");

    for vector in &suite.tests {
        if vector.is_legacy() && !cfg!(feature = "legacy") {
            continue;
        }
        let key = key_from_hex(&vector.key);
        let wrong_aad = format!("{}!", vector.aad);
        assert_eq!(
            symmetric::decrypt(&vector.blob, &key, wrong_aad.as_bytes()),
            Err(StrongboxError::InvalidSignature),
            "{}",
            vector.name
        );
    }
}

#[test]
fn test_envelope_vectors_reject_wrong_key() {
    let suite: EnvelopeSuite = load("envelopes.json");
    let wrong = EncryptionKey::from_bytes(&[0x71u8; 32]).expect("valid key");

    for vector in suite.tests.iter().filter(|v| !v.is_legacy()) {
        assert_eq!(
            symmetric::decrypt(&vector.blob, &wrong, vector.aad.as_bytes()),
            Err(StrongboxError::InvalidSignature),
            "{}",
            vector.name
        );
    }
}

// =============================================================================
// Keys and MACs
// =============================================================================

#[test]
fn test_key_export_vectors() {
    let suite: KeySuite = load("keys.json");

    for vector in &suite.exports {
        let raw = hex::decode(&vector.key).expect("hex key");
        let exported = HiddenString::from(vector.exported.as_str());
        match vector.kind.as_str() {
            "encryption" => {
                let key = EncryptionKey::from_bytes(&raw).expect("valid key");
                assert_eq!(key_factory::export(&key).expect("export"), exported);
                let imported =
                    key_factory::import::<SymmetricEncryption>(&exported).expect("import");
                assert_eq!(imported, key);
            }
            "authentication" => {
                let key = AuthenticationKey::from_bytes(&raw).expect("valid key");
                assert_eq!(key_factory::export(&key).expect("export"), exported);
                let imported = key_factory::import::<Authentication>(&exported).expect("import");
                assert_eq!(imported, key);
            }
            other => panic!("unexpected kind {other}"),
        }
    }
}

#[test]
fn test_mac_vectors() {
    let suite: KeySuite = load("keys.json");

    for vector in &suite.macs {
        let key = AuthenticationKey::from_bytes(&hex::decode(&vector.key).expect("hex key"))
            .expect("valid key");
        let mac = symmetric::authenticate(vector.message.as_bytes(), &key).expect("mac");
        assert_eq!(mac, vector.mac, "{}", vector.name);
        assert!(symmetric::verify(vector.message.as_bytes(), &key, &vector.mac).expect("verify"));
    }
}
