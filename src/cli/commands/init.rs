//! `cryptovault init` — generate a key pair, register the public half,
//! and save the private half to the key file.

use std::path::{Path, PathBuf};

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::crypto::keyfile::write_key_file;
use crate::errors::{Result, VaultError};
use crate::store::CredentialStore;
use crate::vault::{Registration, Vault};

/// Execute the `init` command.
pub fn execute(cli: &Cli, force: bool, with_samples: bool, out: Option<&str>) -> Result<()> {
    let ctx = Context::load(cli)?;
    let key_path = out.map_or_else(|| ctx.key_file(), PathBuf::from);

    // 1. Never clobber an existing key file: it may be the only way to
    //    read credentials already stored.
    if key_path.exists() {
        output::tip("Use `cryptovault open` to unlock the vault with the existing key.");
        return Err(VaultError::KeyFileError(format!(
            "key file already exists at {}",
            key_path.display()
        )));
    }

    // 2. Generate the key pair, save the private half, then register
    //    the public half. We keep no copy of the private key.
    let mut vault = ctx.connect()?;
    if force {
        output::warning("Forcing a new key pair — credentials stored under the old key become unreadable.");
    }
    let registration = vault.prepare_keys(force)?;
    save_then_register(&mut vault, &registration, &key_path)?;

    output::success(&format!("Private key saved to {}", key_path.display()));
    output::success(&format!(
        "Public key registered (fingerprint {})",
        registration.fingerprint
    ));
    output::warning(
        "Keep this file safe! It is the only way to open your vault and cannot be recovered.",
    );

    // 3. Keep the key file and local state out of git.
    let relative = key_path.strip_prefix(&ctx.project_dir).map_or_else(
        |_| key_path.to_string_lossy().to_string(),
        |p| p.to_string_lossy().to_string(),
    );
    let data_dir = format!("{}/", ctx.settings.data_dir.trim_end_matches('/'));
    for entry in crate::cli::gitignore::ignore_paths(&ctx.project_dir, &[relative.as_str(), data_dir.as_str()]) {
        output::info(&format!("Added '{entry}' to .gitignore"));
    }

    // 4. Optional demo entries.
    if with_samples {
        let count = vault.seed_samples(&registration.encryption_key)?;
        output::success(&format!("Stored {count} sample credentials"));
    }

    ctx.audit(
        "init",
        None,
        Some(&format!("fingerprint {}", registration.fingerprint)),
    );

    output::tip("Run `cryptovault add <SITE> <LOGIN>` to store a password.");
    output::tip("Run `cryptovault open` to browse and reveal your passwords.");

    Ok(())
}

/// Write the private key file, then register the public key.
///
/// The account never points at a key nobody holds: if the file cannot be
/// written nothing is registered, and if registration fails the new file
/// is removed again.
fn save_then_register<S: CredentialStore>(
    vault: &mut Vault<S>,
    registration: &Registration,
    key_path: &Path,
) -> Result<()> {
    write_key_file(key_path, &registration.private_key)?;

    if let Err(e) = vault.register_keys(registration) {
        let _ = std::fs::remove_file(key_path);
        return Err(e);
    }
    Ok(())
}
