//! Crash-safe vault file I/O.
//!
//! `write_atomic` never lets the target path observe a partially written
//! file:
//!
//! 1. Write the bytes to a temp file in the target's directory (same
//!    filesystem, so the rename below is atomic).
//! 2. `fsync` the temp file and close it.
//! 3. Rename it over the target.
//! 4. `fsync` the directory so the rename itself survives a crash.
//! 5. Restrict the file to owner-only access.
//!
//! A failure before the rename removes the temp file.  Steps 4 and 5 are
//! best effort: the new contents are already in place, so their failures
//! are logged rather than returned.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;
use tracing::{debug, warn};

use crate::errors::{Result, VaultError};

/// Prefix for temp files created next to the vault.
const TEMP_PREFIX: &str = ".credvault-";

/// Owner read/write only.
#[cfg(unix)]
pub const FILE_MODE: u32 = 0o600;

/// Owner read/write/search only.
#[cfg(unix)]
pub const DIR_MODE: u32 = 0o700;

/// Atomically replace the file at `path` with `data`.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = parent_dir(path);

    // Dropping `tmp` on any early return below deletes the temp file.
    let mut tmp = Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".tmp")
        .tempfile_in(dir)?;

    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;

    // Close the handle; the returned path still cleans up on drop.
    let tmp_path = tmp.into_temp_path();
    debug!(from = %tmp_path.display(), to = %path.display(), "renaming temp file over vault");
    tmp_path.persist(path).map_err(|e| VaultError::Io(e.error))?;

    if let Err(e) = sync_dir(dir) {
        warn!(dir = %dir.display(), error = %e, "failed to sync vault directory");
    }
    if let Err(e) = restrict_permissions(path) {
        warn!(path = %path.display(), error = %e, "failed to restrict vault file permissions");
    }

    Ok(())
}

/// Read the whole vault file.
///
/// A missing file is reported as `VaultNotFound`; anything else as `Io`.
pub fn read_all(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => VaultError::VaultNotFound(path.to_path_buf()),
        _ => VaultError::Io(e),
    })
}

/// Create `dir` (and parents) if missing, owner-only on Unix.
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new()
            .recursive(true)
            .mode(DIR_MODE)
            .create(dir)?;
    }
    #[cfg(not(unix))]
    fs::create_dir_all(dir)?;

    debug!(dir = %dir.display(), "created vault directory");
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

// Directories cannot be opened for syncing on Windows.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(FILE_MODE))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_files_in(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(TEMP_PREFIX))
            .collect()
    }

    #[test]
    fn write_then_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");

        write_atomic(&path, b"first").unwrap();
        assert_eq!(read_all(&path).unwrap(), b"first");

        write_atomic(&path, b"second, longer contents").unwrap();
        assert_eq!(read_all(&path).unwrap(), b"second, longer contents");
        assert!(temp_files_in(dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");
        write_atomic(&path, b"x").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, FILE_MODE);
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let target = dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("child"), b"keep").unwrap();

        assert!(write_atomic(&target, b"data").is_err());
        assert!(target.is_dir());
        assert!(temp_files_in(dir.path()).is_empty());
    }

    #[test]
    fn missing_directory_fails_without_side_effects() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("vault.dat");
        assert!(matches!(write_atomic(&path, b"x"), Err(VaultError::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.dat");
        assert!(matches!(read_all(&path), Err(VaultError::VaultNotFound(_))));
    }

    #[test]
    fn ensure_private_dir_creates_nested_dirs() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_private_dir(&nested).unwrap();
        assert!(nested.is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&nested).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, DIR_MODE);
        }
    }
}
