//! Passphrase-based key derivation using Argon2id + HKDF-SHA256.
//!
//! Deriving the file-encryption key is a two-step process:
//!
//! 1. Argon2id turns the passphrase into a 32-byte master secret using the
//!    vault's cost parameters and salt (slow, memory-hard).
//! 2. HKDF expands the master secret with a static `info` string into the
//!    actual file-encryption key (fast, domain-separated).
//!
//! The passphrase is consumed by step 1 and the master secret is wiped
//! right after step 2.

use argon2::{Algorithm, Argon2, Block, Params, Version};
use rand::RngCore;
use zeroize::Zeroize;

use super::keys::{FileKey, MasterSecret, Passphrase, MASTER_SECRET_LEN};
use crate::errors::{Result, VaultError};

/// Length of a freshly generated salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Shortest salt Argon2 accepts.
pub const MIN_SALT_LEN: usize = 8;

/// Longest salt the header's one-byte length prefix can carry.
pub const MAX_SALT_LEN: usize = 255;

/// Upper bound on the iteration count.
pub const MAX_TIME: u32 = 64;

/// Upper bound on the memory cost (1 GiB).
pub const MAX_MEMORY_KIB: u32 = 1024 * 1024;

/// Argon2id tuning parameters and salt for one vault.
///
/// Generated once at vault creation and stored in the file header so the
/// same passphrase always reproduces the same key.  An empty `salt` means
/// "generate one at creation time".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdfParams {
    /// Number of iterations (default: 3).
    pub time: u32,
    /// Memory cost in KiB (default: 262 144 = 256 MB).
    pub memory_kib: u32,
    /// Parallelism lanes (default: 1).
    pub threads: u8,
    /// Per-vault random salt.
    pub salt: Vec<u8>,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            time: 3,
            memory_kib: 256 * 1024,
            threads: 1,
            salt: Vec::new(),
        }
    }
}

impl KdfParams {
    /// Build parameters with the given costs and no salt yet.
    pub fn new(time: u32, memory_kib: u32, threads: u8) -> Self {
        Self {
            time,
            memory_kib,
            threads,
            salt: Vec::new(),
        }
    }

    /// Return a copy of these params carrying `salt`.
    pub fn with_salt(mut self, salt: Vec<u8>) -> Self {
        self.salt = salt;
        self
    }

    /// Check that Argon2id can run with these parameters and that they
    /// stay within sane resource bounds.
    ///
    /// Returns a human-readable reason on failure; callers pick the error
    /// variant (a bad config at creation vs. a corrupt header on open).
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.time < 1 || self.time > MAX_TIME {
            return Err(format!(
                "iteration count must be in 1..={MAX_TIME} (got {})",
                self.time
            ));
        }
        if self.threads < 1 {
            return Err("thread count must be at least 1".into());
        }
        let min_memory = 8 * u32::from(self.threads);
        if self.memory_kib < min_memory || self.memory_kib > MAX_MEMORY_KIB {
            return Err(format!(
                "memory cost must be in {min_memory}..={MAX_MEMORY_KIB} KiB (got {})",
                self.memory_kib
            ));
        }
        if self.salt.len() < MIN_SALT_LEN || self.salt.len() > MAX_SALT_LEN {
            return Err(format!(
                "salt length must be in {MIN_SALT_LEN}..={MAX_SALT_LEN} bytes (got {})",
                self.salt.len()
            ));
        }
        Ok(())
    }

    /// Like `check`, mapped onto `KeyDerivationFailed`.
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(VaultError::KeyDerivationFailed)
    }
}

/// Run Argon2id over `passphrase`, producing the 32-byte master secret.
///
/// The passphrase is taken by value and dropped (and zeroized) before
/// this function returns, on every path.
pub fn hash_passphrase(passphrase: Passphrase, params: &KdfParams) -> Result<MasterSecret> {
    params.validate()?;

    let argon2_params = Params::new(
        params.memory_kib,
        params.time,
        u32::from(params.threads),
        Some(MASTER_SECRET_LEN),
    )
    .map_err(|e| VaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let mut blocks = allocate_blocks(argon2_params.block_count())?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut master = [0u8; MASTER_SECRET_LEN];
    let hashed = argon2.hash_password_into_with_memory(
        passphrase.as_bytes(),
        &params.salt,
        &mut master,
        blocks.as_mut_slice(),
    );
    drop(passphrase);
    blocks.zeroize();

    let secret = MasterSecret::new(master);
    master.zeroize();

    hashed.map_err(|e| VaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;
    Ok(secret)
}

/// Derive the file-encryption key from a passphrase.
///
/// `info` is the HKDF context string (see `keys::FEK_INFO_V1`).
pub fn derive_file_key(passphrase: Passphrase, params: &KdfParams, info: &[u8]) -> Result<FileKey> {
    let master = hash_passphrase(passphrase, params)?;
    let key = master.expand(info);
    drop(master);
    key
}

/// Reserve the Argon2 working memory up front so an allocation failure
/// comes back as an error instead of aborting.
fn allocate_blocks(count: usize) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    blocks.try_reserve_exact(count).map_err(|e| {
        VaultError::KeyDerivationFailed(format!("cannot allocate {count} Argon2 blocks: {e}"))
    })?;
    blocks.resize(count, Block::default());
    Ok(blocks)
}

/// Generate a cryptographically random salt of `SALT_LEN` bytes.
pub fn generate_salt() -> Vec<u8> {
    let mut salt = vec![0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
