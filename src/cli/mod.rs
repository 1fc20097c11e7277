//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;
use crate::crypto::{KdfParams, Passphrase};
use crate::errors::{Result, VaultError};
use crate::vault::VaultStore;

/// Minimum passphrase length to prevent trivially weak vaults.
const MIN_PASSPHRASE_LEN: usize = 8;

/// Environment variable holding the passphrase for scripted use.
pub const PASSPHRASE_ENV: &str = "CREDVAULT_PASSPHRASE";

/// credvault CLI: encrypted credential store.
#[derive(Parser)]
#[command(name = "credvault", about = "Encrypted credential store", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory holding config.toml and the vault (default: ~/.credvault)
    #[arg(long, env = "CREDVAULT_DIR", global = true)]
    pub dir: Option<PathBuf>,

    /// Vault file path (overrides vault_file from config.toml)
    #[arg(long, env = "CREDVAULT_VAULT", global = true)]
    pub vault: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault
    Init,

    /// Add an entry (secret read from stdin or a hidden prompt)
    Add {
        /// Entry title (e.g. "email")
        #[arg(short, long)]
        title: String,
        /// Account user name
        #[arg(short, long, default_value = "")]
        username: String,
        /// Free-form notes
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Entry id (default: a random UUID)
        #[arg(long)]
        id: Option<String>,
    },

    /// List all entries
    List,

    /// Show one entry
    Show {
        /// Entry id
        id: String,
        /// Print the secret instead of masking it
        #[arg(long)]
        reveal: bool,
    },

    /// Delete an entry
    Delete {
        /// Entry id
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Copy the encrypted vault to or from the sync directory
    Sync {
        #[command(subcommand)]
        action: SyncAction,
    },
}

/// Sync subcommands.
#[derive(clap::Subcommand)]
pub enum SyncAction {
    /// Replace the local vault with the remote copy
    Pull,
    /// Upload the local vault as the remote copy
    Push,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolved locations and settings for one invocation.
pub struct Context {
    pub data_dir: PathBuf,
    pub settings: Settings,
    pub vault_path: PathBuf,
}

impl Context {
    /// Resolve the data dir, load `config.toml`, and pick the vault path.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let data_dir = match &cli.dir {
            Some(dir) => dir.clone(),
            None => Settings::default_data_dir()?,
        };
        let settings = Settings::load(&data_dir)?;
        let vault_path = match &cli.vault {
            Some(path) => path.clone(),
            None => settings.vault_path(&data_dir),
        };
        Ok(Self {
            data_dir,
            settings,
            vault_path,
        })
    }

    /// A locked store for the configured vault, with its sync backend.
    ///
    /// KDF params only matter for `init`; `open` reads them from the file.
    pub fn store(&self, kdf: KdfParams) -> VaultStore {
        VaultStore::new(&self.vault_path, kdf).with_syncer(self.settings.syncer())
    }

    /// Prompt for the passphrase and unlock the configured vault.
    pub fn open_store(&self) -> Result<VaultStore> {
        if !self.vault_path.exists() {
            output::tip("Run `credvault init` to create a vault.");
            return Err(VaultError::VaultNotFound(self.vault_path.clone()));
        }
        let mut store = self.store(KdfParams::default());
        let passphrase = prompt_passphrase()?;
        store.open(passphrase)?;
        Ok(store)
    }
}

/// Get the vault passphrase, trying in order:
/// 1. `CREDVAULT_PASSPHRASE` env var (scripts/CI)
/// 2. Interactive hidden prompt
pub fn prompt_passphrase() -> Result<Passphrase> {
    if let Some(pw) = passphrase_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master passphrase")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Passphrase::from(pw))
}

/// Prompt for a new passphrase with confirmation (used during `init`).
///
/// Also respects `CREDVAULT_PASSPHRASE` and enforces a minimum length.
pub fn prompt_new_passphrase() -> Result<Passphrase> {
    if let Some(pw) = passphrase_from_env() {
        if pw.len() < MIN_PASSPHRASE_LEN {
            return Err(VaultError::CommandFailed(format!(
                "passphrase must be at least {MIN_PASSPHRASE_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let pw = dialoguer::Password::new()
            .with_prompt("Choose master passphrase")
            .with_confirmation(
                "Confirm master passphrase",
                "Passphrases do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("passphrase prompt: {e}")))?;
        let pw = Passphrase::from(pw);

        if pw.len() < MIN_PASSPHRASE_LEN {
            output::warning(&format!(
                "Passphrase must be at least {MIN_PASSPHRASE_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(pw);
    }
}

fn passphrase_from_env() -> Option<Passphrase> {
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Passphrase::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_paths_override_config() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cli = Cli::parse_from([
            "credvault",
            "--dir",
            tmp.path().to_str().unwrap(),
            "--vault",
            "/elsewhere/v.dat",
            "list",
        ]);
        let ctx = Context::resolve(&cli).unwrap();
        assert_eq!(ctx.data_dir, tmp.path());
        assert_eq!(ctx.vault_path, PathBuf::from("/elsewhere/v.dat"));
    }

    #[test]
    fn vault_path_defaults_to_data_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cli = Cli::parse_from(["credvault", "--dir", tmp.path().to_str().unwrap(), "list"]);
        let ctx = Context::resolve(&cli).unwrap();
        assert_eq!(ctx.vault_path, tmp.path().join("vault.dat"));
    }
}
