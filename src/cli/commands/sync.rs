//! `credvault sync pull|push`: move the encrypted vault file to or from
//! the configured sync directory.  No passphrase is needed.

use crate::cli::output;
use crate::cli::{Cli, Context, SyncAction};
use crate::crypto::KdfParams;
use crate::errors::Result;
use crate::vault::persist::ensure_private_dir;

/// Execute the `sync` command.
pub fn execute(cli: &Cli, action: &SyncAction) -> Result<()> {
    let ctx = Context::resolve(cli)?;

    let Some(remote) = ctx.settings.sync_dir.as_ref() else {
        output::info("No sync_dir configured; this vault is local-only.");
        output::tip("Set `sync_dir` in config.toml to enable sync.");
        return Ok(());
    };

    let store = ctx.store(KdfParams::default());
    match action {
        SyncAction::Pull => {
            if let Some(parent) = ctx.vault_path.parent() {
                if !parent.as_os_str().is_empty() {
                    ensure_private_dir(parent)?;
                }
            }
            store.sync_pull()?;
            output::success(&format!("Pulled vault from {}", remote.display()));
        }
        SyncAction::Push => {
            store.sync_push()?;
            output::success(&format!("Pushed vault to {}", remote.display()));
        }
    }

    Ok(())
}
