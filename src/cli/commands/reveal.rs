//! `cryptovault reveal` — decrypt and print one credential's password.

use crate::cli::{unlock_from_file, validate_record_id, Cli, Context};
use crate::errors::{Result, VaultError};
use crate::vault::Freshness;

/// Execute the `reveal` command.
pub fn execute(cli: &Cli, id: &str) -> Result<()> {
    validate_record_id(id)?;
    let ctx = Context::load(cli)?;
    let mut vault = ctx.connect()?;

    if let Freshness::Stale { notice } = vault.refresh() {
        return Err(VaultError::RemoteStore(notice));
    }

    unlock_from_file(&mut vault, &ctx.key_file())?;
    vault.toggle_reveal(id)?;

    // Print only the value so it can be piped (e.g. into a clipboard tool).
    if let Some(plaintext) = vault.revealed(id) {
        println!("{plaintext}");
    }

    ctx.audit("reveal", Some(id), None);
    vault.lock();

    Ok(())
}
