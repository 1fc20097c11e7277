//! `credvault delete`: remove an entry from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{Result, VaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: &str, force: bool) -> Result<()> {
    let ctx = Context::resolve(cli)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete entry '{id}'?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    // Open the vault (requires passphrase), delete and save.
    let mut store = ctx.open_store()?;
    let removed = store
        .delete(id)?
        .ok_or_else(|| VaultError::EntryNotFound(id.to_string()))?;
    store.save()?;

    output::success(&format!("Deleted entry '{}' ({})", removed.id, removed.title));

    Ok(())
}
