//! `credvault init`: create a new, empty vault.

use crate::cli::output;
use crate::cli::{prompt_new_passphrase, Cli, Context};
use crate::errors::{Result, VaultError};
use crate::vault::persist::ensure_private_dir;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::resolve(cli)?;

    // 1. Create the data directory (owner-only) if it doesn't exist.
    if !ctx.data_dir.exists() {
        ensure_private_dir(&ctx.data_dir)?;
        output::info(&format!("Created data directory: {}", ctx.data_dir.display()));
    }
    if let Some(parent) = ctx.vault_path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_private_dir(parent)?;
        }
    }

    // 2. Refuse to overwrite an existing vault.
    if ctx.vault_path.exists() {
        output::tip("Use `credvault add` to add entries to the existing vault.");
        return Err(VaultError::VaultAlreadyExists(ctx.vault_path));
    }

    // 3. Validate the KDF settings before asking for anything.
    let kdf = ctx.settings.kdf_params()?;

    // 4. Prompt for a new passphrase (with confirmation) and create the file.
    let passphrase = prompt_new_passphrase()?;
    let mut store = ctx.store(kdf);
    store.create(passphrase)?;
    store.lock();

    output::success(&format!("Vault created at {}", ctx.vault_path.display()));
    output::tip("Run `credvault add --title <TITLE>` to add an entry.");
    output::tip("Run `credvault list` to see all entries.");

    Ok(())
}
