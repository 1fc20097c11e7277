//! Remote copies of the encrypted vault file.
//!
//! A `Syncer` moves the vault file's *encrypted* bytes between the local
//! path and somewhere else.  It never sees the passphrase, the key, or any
//! decrypted entry.
//!
//! Backends:
//! - `NoopSync`: local-only vaults; both directions do nothing.
//! - `DirectorySync`: mirrors the file into a directory, e.g. a folder a
//!   cloud client keeps in sync.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{Result, VaultError};
use crate::vault::persist;

/// Pull/push capability over an encrypted vault file.
pub trait Syncer {
    /// Replace the local file at `vault_path` with the remote copy.
    fn pull(&self, vault_path: &Path) -> Result<()>;

    /// Upload the local file at `vault_path` as the new remote copy.
    fn push(&self, vault_path: &Path) -> Result<()>;
}

/// A syncer for vaults that live only on this machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSync;

impl Syncer for NoopSync {
    fn pull(&self, _vault_path: &Path) -> Result<()> {
        Ok(())
    }

    fn push(&self, _vault_path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Mirrors the vault file into `remote_dir` under the same file name.
#[derive(Debug, Clone)]
pub struct DirectorySync {
    remote_dir: PathBuf,
}

impl DirectorySync {
    pub fn new(remote_dir: impl Into<PathBuf>) -> Self {
        Self {
            remote_dir: remote_dir.into(),
        }
    }

    /// Where the remote copy of `vault_path` lives.
    pub fn remote_path(&self, vault_path: &Path) -> Result<PathBuf> {
        let name = vault_path.file_name().ok_or_else(|| {
            VaultError::SyncError(format!("vault path {} has no file name", vault_path.display()))
        })?;
        Ok(self.remote_dir.join(name))
    }
}

impl Syncer for DirectorySync {
    fn pull(&self, vault_path: &Path) -> Result<()> {
        let remote = self.remote_path(vault_path)?;
        let data = persist::read_all(&remote)?;
        persist::write_atomic(vault_path, &data)?;
        info!(from = %remote.display(), to = %vault_path.display(), bytes = data.len(), "pulled vault");
        Ok(())
    }

    fn push(&self, vault_path: &Path) -> Result<()> {
        let remote = self.remote_path(vault_path)?;
        if !self.remote_dir.is_dir() {
            return Err(VaultError::SyncError(format!(
                "sync directory {} does not exist",
                self.remote_dir.display()
            )));
        }
        let data = persist::read_all(vault_path)?;
        persist::write_atomic(&remote, &data)?;
        info!(from = %vault_path.display(), to = %remote.display(), bytes = data.len(), "pushed vault");
        Ok(())
    }
}
