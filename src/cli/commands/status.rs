//! `cryptovault status` — account statistics and key status.

use console::style;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::crypto;
use crate::errors::Result;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut vault = ctx.connect()?;
    let status = vault.account_status()?;

    println!("{} {}", style("Store:").bold(), ctx.settings.api_url);
    println!(
        "{} {}",
        style("Credentials:").bold(),
        status.stats.total_credentials
    );

    match &status.fingerprint {
        Some(fp) => println!("{} {fp}", style("Registered key:").bold()),
        None => {
            println!("{} none", style("Registered key:").bold());
            output::tip("Run `cryptovault init` to generate your key pair.");
        }
    }

    // Check the local key file without unlocking anything.
    let key_path = ctx.key_file();
    if !key_path.exists() {
        println!(
            "{} not found at {}",
            style("Key file:").bold(),
            key_path.display()
        );
        return Ok(());
    }

    let local = crypto::load_private_key(&key_path)
        .and_then(|key| key.encryption_key().fingerprint());
    match (local, &status.fingerprint) {
        (Ok(local), Some(registered)) if local.matches(registered) => {
            output::success(&format!("Key file {} matches the account", key_path.display()));
        }
        (Ok(_), Some(_)) => {
            output::warning(&format!(
                "Key file {} does not match the registered public key",
                key_path.display()
            ));
        }
        (Ok(local), None) => {
            println!("{} {} ({local})", style("Key file:").bold(), key_path.display());
        }
        (Err(e), _) => {
            output::error(&format!("Key file {}: {e}", key_path.display()));
        }
    }

    Ok(())
}
