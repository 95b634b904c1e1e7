//! `cryptovault open` — interactive vault session.
//!
//! Loads the credential list, unlocks with the key file when it is
//! present, then loops over a menu until the user quits. Revealed
//! passwords live only in the session and disappear on lock, on idle
//! timeout and on exit.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Password, Select};

use crate::cli::output;
use crate::cli::{unlock_from_file, Cli, Context};
use crate::errors::{Result, VaultError};
use crate::store::HttpCredentialStore;
use crate::vault::{Freshness, RevealState, Vault};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Show,
    Reveal,
    Add,
    Delete,
    Refresh,
    Lock,
    Unlock,
    Quit,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Show => "Show credentials",
            Action::Reveal => "Reveal / hide a password",
            Action::Add => "Add credential",
            Action::Delete => "Delete credential",
            Action::Refresh => "Reload from store",
            Action::Lock => "Lock vault",
            Action::Unlock => "Unlock with key file",
            Action::Quit => "Quit",
        }
    }

    /// Menu entries for the current session state.
    fn menu(unlocked: bool) -> Vec<Action> {
        let mut actions = vec![Action::Show];
        if unlocked {
            actions.push(Action::Reveal);
        }
        actions.extend([Action::Add, Action::Delete, Action::Refresh]);
        actions.push(if unlocked { Action::Lock } else { Action::Unlock });
        actions.push(Action::Quit);
        actions
    }
}

/// Execute the `open` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut vault = ctx.connect()?;

    report_freshness(vault.refresh());

    let key_path = ctx.key_file();
    if key_path.exists() {
        try_unlock(&ctx, &mut vault, key_path);
    } else {
        output::info("Vault is locked. Choose \"Unlock with key file\" to reveal passwords.");
    }

    loop {
        if vault.session_mut().expire_if_idle() {
            output::warning("Vault locked after inactivity.");
            ctx.audit("lock", None, Some("idle timeout"));
        }

        let actions = Action::menu(vault.session().is_unlocked());
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let choice = Select::new()
            .with_prompt("Vault")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("menu: {e}")))?;

        // Recoverable errors are shown and the session carries on.
        let result = match actions[choice] {
            Action::Show => {
                show(&vault);
                Ok(())
            }
            Action::Reveal => reveal(&ctx, &mut vault),
            Action::Add => add(&ctx, &mut vault),
            Action::Delete => delete(&ctx, &mut vault),
            Action::Refresh => {
                report_freshness(vault.refresh());
                show(&vault);
                Ok(())
            }
            Action::Lock => {
                vault.lock();
                ctx.audit("lock", None, None);
                output::success("Vault locked.");
                Ok(())
            }
            Action::Unlock => {
                let path = ask_key_path(&ctx)?;
                try_unlock(&ctx, &mut vault, path);
                Ok(())
            }
            Action::Quit => break,
        };

        match result {
            Err(VaultError::UserCancelled) => output::info("Cancelled."),
            Err(e) => output::error(&e.to_string()),
            Ok(()) => {}
        }
    }

    vault.lock();
    Ok(())
}

fn show(vault: &Vault<HttpCredentialStore>) {
    output::print_credentials_table(vault.records(), |id| vault.revealed(id));
}

fn report_freshness(freshness: Freshness) {
    if let Freshness::Stale { notice } = freshness {
        output::warning(&format!("Showing last known list — {notice}"));
    }
}

fn try_unlock(ctx: &Context, vault: &mut Vault<HttpCredentialStore>, path: PathBuf) {
    match unlock_from_file(vault, &path) {
        Ok(report) => {
            ctx.audit("unlock", None, Some(&format!("fingerprint {}", report.fingerprint)));
            output::success("Vault unlocked.");
        }
        Err(e) => output::error(&e.to_string()),
    }
}

fn ask_key_path(ctx: &Context) -> Result<PathBuf> {
    let default = ctx.key_file().to_string_lossy().to_string();
    let path: String = Input::new()
        .with_prompt("Key file")
        .default(default)
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(PathBuf::from(path))
}

/// Let the user pick one record; `None` when the list is empty.
fn pick_record(vault: &Vault<HttpCredentialStore>, prompt: &str) -> Result<Option<String>> {
    if vault.records().is_empty() {
        output::info("Vault is empty.");
        return Ok(None);
    }

    let labels: Vec<String> = vault
        .records()
        .iter()
        .map(|r| format!("{} — {}", r.site, r.login))
        .collect();
    let choice = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(|e| VaultError::CommandFailed(format!("menu: {e}")))?;

    Ok(choice.map(|i| vault.records()[i].id.clone()))
}

fn reveal(ctx: &Context, vault: &mut Vault<HttpCredentialStore>) -> Result<()> {
    let Some(id) = pick_record(vault, "Reveal / hide")? else {
        return Ok(());
    };

    if vault.toggle_reveal(&id)? == RevealState::Revealed {
        ctx.audit("reveal", Some(&id), None);
    }
    show(vault);
    Ok(())
}

fn add(ctx: &Context, vault: &mut Vault<HttpCredentialStore>) -> Result<()> {
    let site: String = Input::new()
        .with_prompt("Site")
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    let login: String = Input::new()
        .with_prompt("Login")
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    let password = zeroize::Zeroizing::new(
        Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
    );

    let freshness = vault.add_credential(&site, &login, &password)?;
    ctx.audit("add", None, Some(site.trim()));
    output::success(&format!("Stored credential for '{}'", site.trim()));
    report_freshness(freshness);
    show(vault);
    Ok(())
}

fn delete(ctx: &Context, vault: &mut Vault<HttpCredentialStore>) -> Result<()> {
    let Some(id) = pick_record(vault, "Delete")? else {
        return Ok(());
    };
    let site = vault.record(&id).map(|r| r.site.clone()).unwrap_or_default();

    let confirmed = Confirm::new()
        .with_prompt(format!("Delete credential for '{site}'?"))
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;
    if !confirmed {
        return Err(VaultError::UserCancelled);
    }

    vault.delete_credential(&id)?;
    ctx.audit("delete", Some(&id), Some(&site));
    output::success(&format!("Deleted credential for '{site}'"));
    Ok(())
}
