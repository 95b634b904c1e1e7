//! `cryptovault list` — display all stored credentials in a table.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::Result;
use crate::vault::Freshness;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut vault = ctx.connect()?;

    if let Freshness::Stale { notice } = vault.refresh() {
        // Nothing was loaded before, so a stale list is an empty one.
        output::warning(&format!("Could not load credentials: {notice}"));
    }

    output::info(&format!(
        "{} — {} credential(s)",
        ctx.settings.api_url,
        vault.records().len()
    ));

    output::print_credentials_table(vault.records(), |_| None);

    Ok(())
}
