//! Key material wrappers and the HKDF-SHA256 expand step.
//!
//! The Argon2id output (the *master secret*) is never used directly as a
//! cipher key.  It is expanded through HKDF with a fixed `info` string so
//! the file-encryption key is bound to this vault format and version.
//!
//! Every type here wipes its bytes when dropped.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, VaultError};

/// Length of the file-encryption key (256 bits, for XChaCha20-Poly1305).
pub const FEK_LEN: usize = 32;

/// Length of the Argon2id master secret.
pub const MASTER_SECRET_LEN: usize = 32;

/// HKDF `info` context for the version 1 file-encryption key.
pub const FEK_INFO_V1: &[u8] = b"vault v1";

/// A master passphrase that is wiped from memory on drop.
///
/// Key derivation takes a `Passphrase` by value so the bytes are gone as
/// soon as the slow hash has consumed them.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Passphrase(Vec<u8>);

impl Passphrase {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Passphrase {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for Passphrase {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}

/// The symmetric file-encryption key (FEK).
///
/// Lives only while the vault is unlocked and is zeroized on drop.
/// There is exactly one copy; the type cannot be cloned:
///
/// ```compile_fail
/// use credvault::crypto::FileKey;
///
/// let key = FileKey::new([0u8; 32]);
/// let copy: FileKey = key.clone();
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct FileKey {
    bytes: [u8; FEK_LEN],
}

impl FileKey {
    pub fn new(bytes: [u8; FEK_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to the AEAD).
    pub fn as_bytes(&self) -> &[u8; FEK_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for FileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FileKey(<redacted>)")
    }
}

/// Output of the memory-hard step, expanded into a `FileKey` and then dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret {
    bytes: [u8; MASTER_SECRET_LEN],
}

impl MasterSecret {
    pub fn new(bytes: [u8; MASTER_SECRET_LEN]) -> Self {
        Self { bytes }
    }

    /// Expand this master secret into the file-encryption key for `info`.
    pub fn expand(&self, info: &[u8]) -> Result<FileKey> {
        expand_file_key(&self.bytes, info)
    }
}

/// HKDF-SHA256 extract-and-expand with no salt.
///
/// The same master secret and `info` always give the same key; a
/// different `info` gives an unrelated one.
pub fn expand_file_key(master: &[u8], info: &[u8]) -> Result<FileKey> {
    let hk = Hkdf::<Sha256>::new(None, master);

    let mut okm = [0u8; FEK_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    let key = FileKey::new(okm);
    okm.zeroize();
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_is_deterministic() {
        let master = [0x42u8; MASTER_SECRET_LEN];
        let a = expand_file_key(&master, FEK_INFO_V1).unwrap();
        let b = expand_file_key(&master, FEK_INFO_V1).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn expand_is_domain_separated() {
        let master = [0x42u8; MASTER_SECRET_LEN];
        let a = expand_file_key(&master, b"vault v1").unwrap();
        let b = expand_file_key(&master, b"vault v2").unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn expanded_key_differs_from_master() {
        let master = MasterSecret::new([7u8; MASTER_SECRET_LEN]);
        let key = master.expand(FEK_INFO_V1).unwrap();
        assert_ne!(key.as_bytes(), &[7u8; FEK_LEN]);
    }

    #[test]
    fn debug_output_is_redacted() {
        let pw = Passphrase::from("hunter2");
        let key = FileKey::new([1u8; FEK_LEN]);
        assert!(!format!("{pw:?}").contains("hunter2"));
        assert_eq!(format!("{key:?}"), "FileKey(<redacted>)");
    }
}
