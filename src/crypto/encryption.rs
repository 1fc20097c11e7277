//! XChaCha20-Poly1305 authenticated encryption.
//!
//! Each call to `seal` generates a fresh random 24-byte nonce.  The nonce
//! is returned separately (it goes into the file header), never prepended
//! to the ciphertext.  The 192-bit nonce space makes random collisions
//! under one key negligible, so no counter is kept.

use chacha20poly1305::aead::{Aead, KeyInit, OsRng, Payload};
use chacha20poly1305::{AeadCore, XChaCha20Poly1305, XNonce};
use zeroize::Zeroizing;

use super::keys::FileKey;
use crate::errors::{Result, VaultError};

/// Size of the XChaCha20-Poly1305 nonce in bytes.
pub const NONCE_LEN: usize = 24;

/// Size of the Poly1305 authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under `key`, authenticating `aad` alongside it.
///
/// Returns `(nonce, ciphertext)`; the ciphertext includes the tag.
pub fn seal(key: &FileKey, plaintext: &[u8], aad: &[u8]) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&nonce);
    Ok((nonce_bytes, ciphertext))
}

/// Decrypt and verify data produced by `seal`.
///
/// Any failure (wrong key, modified ciphertext, modified `aad`, wrong
/// nonce) is reported as `AuthenticationFailed` with no further detail.
pub fn open(key: &FileKey, nonce: &[u8], aad: &[u8], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if nonce.len() != NONCE_LEN || ciphertext.len() < TAG_LEN {
        return Err(VaultError::AuthenticationFailed);
    }

    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let plaintext = cipher
        .decrypt(
            XNonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| VaultError::AuthenticationFailed)?;

    Ok(Zeroizing::new(plaintext))
}
