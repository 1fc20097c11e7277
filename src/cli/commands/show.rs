//! `credvault show`: print a single entry.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{Result, VaultError};

/// Execute the `show` command.
pub fn execute(cli: &Cli, id: &str, reveal: bool) -> Result<()> {
    let ctx = Context::resolve(cli)?;
    let store = ctx.open_store()?;

    let entry = store
        .get(id)?
        .ok_or_else(|| VaultError::EntryNotFound(id.to_string()))?;
    output::print_entry(entry, reveal);

    if !reveal {
        output::tip("Pass --reveal to print the secret.");
    }

    Ok(())
}
