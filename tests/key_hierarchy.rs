//! Key kinds, key pair construction and public-key operations.

#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

use strongbox::core::operations::{asymmetric, key_factory};
use strongbox::core::types::SignatureSecret;
use strongbox::{
    AnyKey, EncryptionKeyPair, HiddenString, KeyKind, SignatureKeyPair, StrongboxError,
};

fn signature_pair_parts() -> (SignatureKeyPair, Vec<u8>, Vec<u8>) {
    let pair = key_factory::generate_signature_key_pair().expect("rng");
    let secret = pair.secret_key().as_bytes().to_vec();
    let public = pair.public_key().as_bytes().to_vec();
    (pair, secret, public)
}

#[test]
fn test_flags_are_fixed_by_type() {
    let symmetric = key_factory::generate_encryption_key().expect("rng");
    assert!(symmetric.is_encryption_key());
    assert!(!symmetric.is_asymmetric());
    assert!(!symmetric.is_signing_key());
    assert!(!symmetric.is_public_key());

    let auth = key_factory::generate_authentication_key().expect("rng");
    assert_eq!(auth.kind(), KeyKind::Authentication);
    assert!(!auth.is_encryption_key());

    let (pair, _, _) = signature_pair_parts();
    assert!(pair.secret_key().is_signing_key());
    assert!(pair.secret_key().is_asymmetric());
    assert!(!pair.secret_key().is_public_key());
    assert!(pair.public_key().is_public_key());
}

#[test]
fn test_key_pair_rejects_illegal_combinations() {
    let (_, secret, public) = signature_pair_parts();
    let encryption = key_factory::generate_encryption_key_pair().expect("rng");

    let cases: Vec<(AnyKey, AnyKey)> = vec![
        (
            AnyKey::new(KeyKind::SignaturePublic, &public).expect("key"),
            AnyKey::new(KeyKind::SignaturePublic, &public).expect("key"),
        ),
        (
            AnyKey::new(KeyKind::SignatureSecret, &secret).expect("key"),
            AnyKey::new(KeyKind::SignatureSecret, &secret).expect("key"),
        ),
        (
            AnyKey::new(KeyKind::SymmetricEncryption, &[1u8; 32]).expect("key"),
            AnyKey::new(KeyKind::SignaturePublic, &public).expect("key"),
        ),
        (
            AnyKey::new(KeyKind::SignatureSecret, &secret).expect("key"),
            AnyKey::new(KeyKind::Authentication, &[1u8; 32]).expect("key"),
        ),
        (
            AnyKey::new(KeyKind::SignatureSecret, &secret).expect("key"),
            AnyKey::new(KeyKind::EncryptionPublic, encryption.public_key().as_bytes())
                .expect("key"),
        ),
    ];

    for (first, second) in cases {
        assert_eq!(
            SignatureKeyPair::from_keys(first, second),
            Err(StrongboxError::InvalidKey)
        );
    }
}

#[test]
fn test_key_pair_accepts_either_order() {
    let (pair, secret, public) = signature_pair_parts();
    let forward = SignatureKeyPair::from_keys(
        AnyKey::new(KeyKind::SignatureSecret, &secret).expect("key"),
        AnyKey::new(KeyKind::SignaturePublic, &public).expect("key"),
    )
    .expect("valid pair");
    let backward = SignatureKeyPair::from_keys(
        AnyKey::new(KeyKind::SignaturePublic, &public).expect("key"),
        AnyKey::new(KeyKind::SignatureSecret, &secret).expect("key"),
    )
    .expect("valid pair");
    assert_eq!(forward, pair);
    assert_eq!(backward, pair);
}

#[test]
fn test_signature_to_encryption_pair() {
    let signing = key_factory::generate_signature_key_pair().expect("rng");
    let encryption = signing.to_encryption_key_pair().expect("convert");

    // Piecewise conversion agrees with the pair conversion.
    assert_eq!(
        signing
            .public_key()
            .to_encryption_public_key()
            .expect("convert"),
        *encryption.public_key()
    );
    assert_eq!(
        encryption.secret_key().derive_public_key().expect("derive"),
        *encryption.public_key()
    );
}

#[test]
fn test_asymmetric_roundtrip_with_converted_keys() {
    let alice = key_factory::generate_signature_key_pair()
        .expect("rng")
        .to_encryption_key_pair()
        .expect("convert");
    let bob = EncryptionKeyPair::generate().expect("rng");

    let blob = asymmetric::encrypt(
        &HiddenString::from("hi bob"),
        alice.secret_key(),
        bob.public_key(),
        b"",
    )
    .expect("encrypt");
    let plaintext =
        asymmetric::decrypt(&blob, bob.secret_key(), alice.public_key(), b"").expect("decrypt");
    assert_eq!(plaintext.expose(), b"hi bob");
}

#[test]
fn test_signatures() {
    let pair = key_factory::generate_signature_key_pair().expect("rng");
    let signature = asymmetric::sign(b"release v1.2.3", pair.secret_key()).expect("sign");
    assert!(asymmetric::verify(b"release v1.2.3", pair.public_key(), &signature).expect("verify"));
    assert!(!asymmetric::verify(b"release v1.2.4", pair.public_key(), &signature).expect("verify"));
}

#[test]
fn test_exported_key_is_not_an_envelope() {
    let key = key_factory::generate_encryption_key().expect("rng");
    let exported = key_factory::export(&key).expect("export");
    let text = exported.expose_str().expect("utf8");
    assert!(matches!(
        strongbox::core::header::resolve(text),
        Err(StrongboxError::InvalidMessage(_))
    ));
}

#[test]
fn test_import_into_wrong_role() {
    let pair = key_factory::generate_encryption_key_pair().expect("rng");
    let exported = key_factory::export_key_pair(&pair).expect("export");
    // 32-byte X25519 secret cannot become a 64-byte Ed25519 secret.
    assert_eq!(
        key_factory::import::<SignatureSecret>(&exported),
        Err(StrongboxError::InvalidKey)
    );
}
