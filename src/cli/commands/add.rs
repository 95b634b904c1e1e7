//! `cryptovault add` — encrypt a password and store it.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{Result, VaultError};
use crate::vault::Freshness;

/// Execute the `add` command.
pub fn execute(cli: &Cli, site: &str, login: &str) -> Result<()> {
    let ctx = Context::load(cli)?;
    crate::vault::credential::validate_entry(site, login)?;

    let password = read_password(site)?;
    if password.is_empty() {
        return Err(VaultError::CommandFailed("password cannot be empty".into()));
    }

    let mut vault = ctx.connect()?;
    let freshness = vault.add_credential(site, login, &password)?;

    ctx.audit("add", None, Some(site.trim()));
    output::success(&format!("Stored credential for '{}'", site.trim()));

    if let Freshness::Stale { notice } = freshness {
        output::warning(&format!(
            "Saved, but the list could not be reloaded: {notice}"
        ));
    }

    Ok(())
}

/// Read the password from piped stdin or an interactive prompt.
///
/// Never accepted as a command-line argument, so it cannot end up in
/// shell history.
fn read_password(site: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string());
        return Ok(trimmed);
    }

    let password = dialoguer::Password::new()
        .with_prompt(format!("Password for {site}"))
        .with_confirmation("Confirm password", "Passwords do not match, try again")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(password))
}
