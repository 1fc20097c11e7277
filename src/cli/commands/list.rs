//! `credvault list`: display all entries in a table.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::resolve(cli)?;
    let store = ctx.open_store()?;

    let entries = store.list()?;
    output::print_entries_table(entries);
    if !entries.is_empty() {
        output::info(&format!("{} entries in {}", entries.len(), store.path().display()));
    }

    Ok(())
}
