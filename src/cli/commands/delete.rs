//! `cryptovault delete` — remove a credential from the store.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{validate_record_id, Cli, Context};
use crate::errors::{Result, VaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: &str, force: bool) -> Result<()> {
    validate_record_id(id)?;
    let ctx = Context::load(cli)?;
    let mut vault = ctx.connect()?;

    if let crate::vault::Freshness::Stale { notice } = vault.refresh() {
        return Err(VaultError::RemoteStore(notice));
    }

    let site = vault
        .record(id)
        .map(|r| r.site.clone())
        .ok_or_else(|| VaultError::CredentialNotFound(id.to_string()))?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete credential for '{site}' ({id})?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    vault.delete_credential(id)?;

    ctx.audit("delete", Some(id), Some(&site));
    output::success(&format!("Deleted credential for '{site}'"));

    Ok(())
}
