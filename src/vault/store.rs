//! High-level vault operations used by the CLI.
//!
//! `VaultStore` ties the crypto layer, the header codec and the atomic
//! file writer together so callers can work with `create`, `open`, `save`
//! and simple CRUD calls over entries.
//!
//! The store never saves on its own: every mutation must be followed by
//! an explicit `save()`, otherwise it is lost when the store is dropped.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::crypto::encryption::{self, NONCE_LEN};
use crate::crypto::kdf::{derive_file_key, generate_salt, KdfParams};
use crate::crypto::keys::{FileKey, Passphrase, FEK_INFO_V1};
use crate::errors::{Result, VaultError};
use crate::sync::Syncer;

use super::entry::{Entry, Payload};
use super::format::{self, FileHeader, MAGIC};
use super::persist;

/// Where a store is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultStatus {
    /// No vault file exists at the path yet.
    Uninitialized,
    /// A vault file exists but no key is held in memory.
    Locked,
    /// The key and decrypted entries are in memory.
    Unlocked,
}

/// Key and entries of an unlocked vault.  Both wipe themselves on drop.
struct Session {
    key: FileKey,
    payload: Payload,
}

/// The main vault handle.
///
/// Build one with `VaultStore::new`, then `create` a new vault or `open`
/// an existing one.  Not safe for concurrent use; wrap it in a mutex if
/// it has to be shared across threads.
pub struct VaultStore {
    /// Path to the vault file on disk.
    path: PathBuf,

    /// KDF params: the caller's choice until `open` replaces them with the
    /// ones stored in the file header.
    kdf: KdfParams,

    /// Present only while unlocked.
    session: Option<Session>,

    /// Optional remote copy of the encrypted file.
    syncer: Option<Box<dyn Syncer>>,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// A locked store for the vault at `path`.
    ///
    /// `kdf` is only used by `create`; an empty salt there means a fresh
    /// random one is generated.
    pub fn new(path: impl Into<PathBuf>, kdf: KdfParams) -> Self {
        Self {
            path: path.into(),
            kdf,
            session: None,
            syncer: None,
        }
    }

    /// Attach a sync backend (builder style).
    pub fn with_syncer(mut self, syncer: Box<dyn Syncer>) -> Self {
        self.syncer = Some(syncer);
        self
    }

    pub fn set_syncer(&mut self, syncer: Box<dyn Syncer>) {
        self.syncer = Some(syncer);
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Create a brand-new, empty vault file and leave the store unlocked.
    ///
    /// Fails with `VaultAlreadyExists` if anything is already at the path.
    pub fn create(&mut self, passphrase: Passphrase) -> Result<()> {
        if self.path.exists() {
            return Err(VaultError::VaultAlreadyExists(self.path.clone()));
        }
        self.lock();

        if self.kdf.salt.is_empty() {
            self.kdf.salt = generate_salt();
        }

        let key = derive_file_key(passphrase, &self.kdf, FEK_INFO_V1)?;
        let session = Session {
            key,
            payload: Payload::default(),
        };

        self.write(&session)?;
        self.session = Some(session);

        info!(
            path = %self.path.display(),
            kdf_time = self.kdf.time,
            kdf_memory_kib = self.kdf.memory_kib,
            kdf_threads = self.kdf.threads,
            "created vault"
        );
        Ok(())
    }

    /// Unlock an existing vault.
    ///
    /// The KDF params are taken from the file header, so a vault created
    /// with other cost settings still opens.  A wrong passphrase and a
    /// tampered file both fail with `AuthenticationFailed`.
    pub fn open(&mut self, passphrase: Passphrase) -> Result<()> {
        self.lock();

        let raw = persist::read_all(&self.path)?;
        let (header, ciphertext) = format::decode(&raw)?;
        if header.nonce.len() != NONCE_LEN {
            return Err(VaultError::CorruptFormat(format!(
                "nonce must be {NONCE_LEN} bytes (got {})",
                header.nonce.len()
            )));
        }

        self.kdf = header.kdf_params();

        let key = derive_file_key(passphrase, &self.kdf, FEK_INFO_V1)?;
        let plaintext = encryption::open(&key, &header.nonce, MAGIC, ciphertext)?;
        let payload = Payload::from_bytes(&plaintext)?;

        debug!(path = %self.path.display(), entries = payload.entries.len(), "opened vault");
        self.session = Some(Session { key, payload });
        Ok(())
    }

    /// Re-seal the current entries under the existing key with a fresh
    /// nonce and write the file atomically.
    pub fn save(&self) -> Result<()> {
        let session = self.session()?;
        self.write(session)?;
        debug!(path = %self.path.display(), entries = session.payload.entries.len(), "saved vault");
        Ok(())
    }

    /// Drop the key and decrypted entries from memory (zeroizing them).
    /// Unsaved changes are discarded.
    pub fn lock(&mut self) {
        if self.session.take().is_some() {
            debug!(path = %self.path.display(), "locked vault");
        }
    }

    pub fn status(&self) -> VaultStatus {
        if self.session.is_some() {
            VaultStatus::Unlocked
        } else if self.path.exists() {
            VaultStatus::Locked
        } else {
            VaultStatus::Uninitialized
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.session.is_some()
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// All entries in insertion order.
    pub fn list(&self) -> Result<&[Entry]> {
        Ok(&self.session()?.payload.entries)
    }

    /// Append an entry.  Ids must be unique within the vault.
    pub fn add(&mut self, entry: Entry) -> Result<()> {
        let entries = &mut self.session_mut()?.payload.entries;
        if entries.iter().any(|e| e.id == entry.id) {
            return Err(VaultError::DuplicateEntry(entry.id.clone()));
        }
        entries.push(entry);
        Ok(())
    }

    /// Look up an entry by id.  `Ok(None)` means not found.
    pub fn get(&self, id: &str) -> Result<Option<&Entry>> {
        Ok(self.session()?.payload.entries.iter().find(|e| e.id == id))
    }

    /// Remove an entry by id, returning it.  Absent ids are a no-op.
    pub fn delete(&mut self, id: &str) -> Result<Option<Entry>> {
        let entries = &mut self.session_mut()?.payload.entries;
        Ok(entries
            .iter()
            .position(|e| e.id == id)
            .map(|pos| entries.remove(pos)))
    }

    pub fn entry_count(&self) -> Result<usize> {
        Ok(self.session()?.payload.entries.len())
    }

    // ------------------------------------------------------------------
    // Sync
    // ------------------------------------------------------------------

    /// Fetch the remote copy over the local file.
    ///
    /// Entries already in memory are not refreshed; `open` again to see
    /// the pulled contents.
    pub fn sync_pull(&self) -> Result<()> {
        self.syncer()?.pull(&self.path)
    }

    /// Upload the local file as the remote copy.
    pub fn sync_push(&self) -> Result<()> {
        self.syncer()?.push(&self.path)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the KDF params in effect (the header's after `open`).
    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(VaultError::VaultLocked)
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        self.session.as_mut().ok_or(VaultError::VaultLocked)
    }

    fn syncer(&self) -> Result<&dyn Syncer> {
        self.syncer
            .as_deref()
            .ok_or_else(|| VaultError::SyncError("no sync backend configured".into()))
    }

    /// Seal, frame and atomically write `session` to disk.
    fn write(&self, session: &Session) -> Result<()> {
        let plaintext = session.payload.to_bytes()?;
        let (nonce, ciphertext) = encryption::seal(&session.key, &plaintext, MAGIC)?;

        let header = FileHeader::new(&self.kdf, &nonce);
        let mut data = format::encode(&header)?;
        data.extend_from_slice(&ciphertext);

        persist::write_atomic(&self.path, &data)
    }
}
