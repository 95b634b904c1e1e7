//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::store::CredentialRecord;
use crate::vault::client::PENDING_ID_PREFIX;
use crate::vault::SiteKind;

/// Shown in place of a password that has not been revealed.
const MASK: &str = "\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print the credential list. `revealed` returns the plaintext of
/// records currently revealed in the session; everything else is masked.
pub fn print_credentials_table<'a>(
    records: &'a [CredentialRecord],
    revealed: impl Fn(&str) -> Option<&'a str>,
) {
    if records.is_empty() {
        info("Vault is empty.");
        tip("Run `cryptovault add <SITE> <LOGIN>` to store your first password.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Site", "Login", "Password", "Id"]);

    for r in records {
        let kind = SiteKind::classify(&r.site);
        let password = revealed(&r.id).unwrap_or(MASK).to_string();
        let id = if r.id.starts_with(PENDING_ID_PREFIX) {
            style("(saving…)").dim().to_string()
        } else {
            r.id.clone()
        };
        table.add_row(vec![
            kind.icon().to_string(),
            r.site.clone(),
            r.login.clone(),
            password,
            id,
        ]);
    }

    println!("{table}");
}
