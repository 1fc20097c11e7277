//! Cryptographic primitives for credvault.
//!
//! This module provides:
//! - XChaCha20-Poly1305 sealing and opening (`encryption`)
//! - Argon2id + HKDF file-key derivation (`kdf`)
//! - Zeroizing key material wrappers (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, derive_file_key, ...};
pub use encryption::{open, seal, NONCE_LEN};
pub use kdf::{derive_file_key, generate_salt, KdfParams};
pub use keys::{FileKey, Passphrase, FEK_INFO_V1};
