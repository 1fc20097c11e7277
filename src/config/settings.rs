use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::KdfParams;
use crate::errors::{Result, VaultError};
use crate::sync::{DirectorySync, NoopSync, Syncer};

/// Name of the per-user data directory under `$HOME`.
pub const DEFAULT_DIR_NAME: &str = ".credvault";

/// Minimum Argon2 memory cost accepted from the config file (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// User-level configuration, loaded from `<data_dir>/config.toml`.
///
/// Every field has a sensible default so credvault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault file name (or absolute path) inside the data directory.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Argon2 iteration count for new vaults (default: 3).
    #[serde(default = "default_kdf_time")]
    pub kdf_time: u32,

    /// Argon2 memory cost in KiB for new vaults (default: 256 MB).
    #[serde(default = "default_kdf_memory_kib")]
    pub kdf_memory_kib: u32,

    /// Argon2 parallelism for new vaults (default: 1).
    #[serde(default = "default_kdf_threads")]
    pub kdf_threads: u8,

    /// Directory to mirror the encrypted vault into for `sync`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_dir: Option<PathBuf>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_file() -> String {
    "vault.dat".to_string()
}

fn default_kdf_time() -> u32 {
    3
}

fn default_kdf_memory_kib() -> u32 {
    262_144 // 256 MB
}

fn default_kdf_threads() -> u8 {
    1
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            kdf_time: default_kdf_time(),
            kdf_memory_kib: default_kdf_memory_kib(),
            kdf_threads: default_kdf_threads(),
            sync_dir: None,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the data directory.
    const FILE_NAME: &'static str = "config.toml";

    /// Load settings from `<data_dir>/config.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// The default data directory: `~/.credvault`.
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_DIR_NAME))
            .ok_or_else(|| VaultError::ConfigError("cannot determine home directory".into()))
    }

    /// Full path to the vault file.
    ///
    /// Example: `~/.credvault/vault.dat`
    pub fn vault_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.vault_file)
    }

    /// Convert the KDF settings into crypto-layer params for a new vault.
    ///
    /// Enforces a minimum memory cost so a config typo cannot produce a
    /// trivially brute-forceable vault.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        if self.kdf_memory_kib < MIN_MEMORY_KIB {
            return Err(VaultError::ConfigError(format!(
                "kdf_memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.kdf_memory_kib
            )));
        }
        Ok(KdfParams::new(
            self.kdf_time,
            self.kdf_memory_kib,
            self.kdf_threads,
        ))
    }

    /// The sync backend: a directory mirror if `sync_dir` is set,
    /// otherwise local-only.
    pub fn syncer(&self) -> Box<dyn Syncer> {
        match &self.sync_dir {
            Some(dir) => Box::new(DirectorySync::new(dir)),
            None => Box::new(NoopSync),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.vault_file, "vault.dat");
        assert_eq!(s.kdf_time, 3);
        assert_eq!(s.kdf_memory_kib, 262_144);
        assert_eq!(s.kdf_threads, 1);
        assert!(s.sync_dir.is_none());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_file, "vault.dat");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
vault_file = "work.dat"
kdf_time = 5
kdf_memory_kib = 131072
kdf_threads = 2
sync_dir = "/mnt/cloud/vaults"
"#;
        fs::write(tmp.path().join("config.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_file, "work.dat");
        assert_eq!(settings.kdf_time, 5);
        assert_eq!(settings.kdf_memory_kib, 131_072);
        assert_eq!(settings.kdf_threads, 2);
        assert_eq!(settings.sync_dir, Some(PathBuf::from("/mnt/cloud/vaults")));
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "kdf_time = 4\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.kdf_time, 4);
        // Rest should be defaults
        assert_eq!(settings.vault_file, "vault.dat");
        assert_eq!(settings.kdf_memory_kib, 262_144);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(VaultError::ConfigError(_))));
    }

    #[test]
    fn vault_path_builds_correct_path() {
        let s = Settings::default();
        let path = s.vault_path(Path::new("/home/user/.credvault"));
        assert_eq!(path, PathBuf::from("/home/user/.credvault/vault.dat"));
    }

    #[test]
    fn kdf_params_enforce_memory_floor() {
        let s = Settings {
            kdf_memory_kib: 1024,
            ..Settings::default()
        };
        assert!(s.kdf_params().is_err());

        let params = Settings::default().kdf_params().unwrap();
        assert_eq!(params, KdfParams::default());
    }
}
