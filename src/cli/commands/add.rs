//! `credvault add`: store a new entry.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroize;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{Result, VaultError};
use crate::vault::Entry;

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    title: &str,
    username: &str,
    notes: &str,
    id: Option<&str>,
) -> Result<()> {
    let ctx = Context::resolve(cli)?;

    // Open first so a wrong passphrase fails before asking for the secret.
    let mut store = ctx.open_store()?;

    let secret = read_secret(title)?;
    let id = id.map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string);

    let entry = Entry::new(id.clone(), title)
        .with_username(username)
        .with_secret(secret)
        .with_notes(notes);

    store.add(entry)?;
    store.save()?;

    output::success(&format!(
        "Entry '{title}' added with id {id} ({} total)",
        store.entry_count()?
    ));

    Ok(())
}

/// Read the secret from piped stdin, or prompt for it without echo.
fn read_secret(title: &str) -> Result<Vec<u8>> {
    if !io::stdin().is_terminal() {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        return Ok(buf);
    }

    let mut value = dialoguer::Password::new()
        .with_prompt(format!("Secret for {title}"))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    let bytes = value.as_bytes().to_vec();
    value.zeroize();
    Ok(bytes)
}
