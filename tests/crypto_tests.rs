//! Integration tests for the credvault crypto module.

use credvault::crypto::keys::{expand_file_key, MasterSecret};
use credvault::crypto::{
    derive_file_key, generate_salt, open, seal, FileKey, KdfParams, Passphrase, FEK_INFO_V1,
    NONCE_LEN,
};
use credvault::errors::VaultError;

fn fast_params(salt: &[u8]) -> KdfParams {
    KdfParams::new(1, 8, 1).with_salt(salt.to_vec())
}

// ---------------------------------------------------------------------------
// Sealing round-trip
// ---------------------------------------------------------------------------

#[test]
fn seal_open_roundtrip() {
    let key = FileKey::new([0xAB; 32]);
    let plaintext = br#"{"Entries":[]}"#;

    let (nonce, ciphertext) = seal(&key, plaintext, b"GVLT").expect("seal should succeed");

    // Poly1305 tag is appended.
    assert_eq!(ciphertext.len(), plaintext.len() + 16);
    assert_eq!(nonce.len(), NONCE_LEN);

    let recovered = open(&key, &nonce, b"GVLT", &ciphertext).expect("open should succeed");
    assert_eq!(recovered.as_slice(), plaintext);
}

#[test]
fn seal_uses_a_fresh_nonce_each_time() {
    let key = FileKey::new([0xCD; 32]);

    let (n1, ct1) = seal(&key, b"same", b"GVLT").unwrap();
    let (n2, ct2) = seal(&key, b"same", b"GVLT").unwrap();

    assert_ne!(n1, n2, "nonces must never repeat");
    assert_ne!(ct1, ct2);
}

#[test]
fn open_fails_with_wrong_key_or_aad() {
    let key = FileKey::new([0x11; 32]);
    let other = FileKey::new([0x22; 32]);
    let (nonce, ct) = seal(&key, b"secret", b"GVLT").unwrap();

    assert!(matches!(
        open(&other, &nonce, b"GVLT", &ct),
        Err(VaultError::AuthenticationFailed)
    ));
    assert!(matches!(
        open(&key, &nonce, b"XXXX", &ct),
        Err(VaultError::AuthenticationFailed)
    ));
}

#[test]
fn open_fails_on_tampered_ciphertext() {
    let key = FileKey::new([0x33; 32]);
    let (nonce, mut ct) = seal(&key, b"secret", b"GVLT").unwrap();

    let last = ct.len() - 1;
    ct[last] ^= 0x01;
    assert!(matches!(
        open(&key, &nonce, b"GVLT", &ct),
        Err(VaultError::AuthenticationFailed)
    ));
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derivation_is_deterministic() {
    let salt = [7u8; 16];
    let k1 = derive_file_key(Passphrase::from("correct horse"), &fast_params(&salt), FEK_INFO_V1)
        .unwrap();
    let k2 = derive_file_key(Passphrase::from("correct horse"), &fast_params(&salt), FEK_INFO_V1)
        .unwrap();
    assert_eq!(k1.as_bytes(), k2.as_bytes());
}

#[test]
fn derivation_depends_on_every_input() {
    let salt = [7u8; 16];
    let base =
        derive_file_key(Passphrase::from("pw"), &fast_params(&salt), FEK_INFO_V1).unwrap();

    let other_pw =
        derive_file_key(Passphrase::from("pw2"), &fast_params(&salt), FEK_INFO_V1).unwrap();
    let other_salt =
        derive_file_key(Passphrase::from("pw"), &fast_params(&[8u8; 16]), FEK_INFO_V1).unwrap();
    let other_info =
        derive_file_key(Passphrase::from("pw"), &fast_params(&salt), b"vault v2").unwrap();
    let other_cost = derive_file_key(
        Passphrase::from("pw"),
        &KdfParams::new(2, 8, 1).with_salt(salt.to_vec()),
        FEK_INFO_V1,
    )
    .unwrap();

    for other in [&other_pw, &other_salt, &other_info, &other_cost] {
        assert_ne!(base.as_bytes(), other.as_bytes());
    }
}

#[test]
fn derivation_rejects_bad_params() {
    let err = derive_file_key(
        Passphrase::from("pw"),
        &KdfParams::new(0, 8, 1).with_salt(vec![1; 16]),
        FEK_INFO_V1,
    );
    assert!(matches!(err, Err(VaultError::KeyDerivationFailed(_))));

    let short_salt = derive_file_key(
        Passphrase::from("pw"),
        &KdfParams::new(1, 8, 1).with_salt(vec![1; 4]),
        FEK_INFO_V1,
    );
    assert!(matches!(short_salt, Err(VaultError::KeyDerivationFailed(_))));
}

#[test]
fn hkdf_expansion_matches_master_secret_expand() {
    let master = [0x42u8; 32];
    let a = expand_file_key(&master, FEK_INFO_V1).unwrap();
    let b = MasterSecret::new(master).expand(FEK_INFO_V1).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn generated_salts_are_random() {
    let s1 = generate_salt();
    let s2 = generate_salt();
    assert_eq!(s1.len(), 16);
    assert_ne!(s1, s2);
}
