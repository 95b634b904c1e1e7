//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod gitignore;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::store::{CredentialStore, HttpCredentialStore};
use crate::vault::{UnlockReport, Vault, VaultSession};

/// CryptoVault CLI: client-side encrypted credential vault.
#[derive(Parser)]
#[command(
    name = "cryptovault",
    about = "Client-side encrypted credential vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Credential store base URL (overrides .cryptovault.toml)
    #[arg(long, env = "CRYPTOVAULT_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Local state directory (overrides .cryptovault.toml)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Private key file (default: key.pem)
    #[arg(long, global = true)]
    pub key_file: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate a key pair, register the public key, save the private key file
    Init {
        /// Generate a new key even if the account already holds credentials
        #[arg(long)]
        force: bool,

        /// Store a few sample credentials encrypted under the new key
        #[arg(long)]
        with_samples: bool,

        /// Where to write the private key file (default: key.pem)
        #[arg(short, long)]
        out: Option<String>,
    },

    /// List stored credentials (passwords stay hidden)
    List,

    /// Encrypt and store a new credential
    Add {
        /// Site label (e.g. Netflix)
        site: String,
        /// Login or e-mail for the site
        login: String,
    },

    /// Delete a credential
    Delete {
        /// Credential id (see `list`)
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Decrypt and print one credential's password
    Reveal {
        /// Credential id (see `list`)
        id: String,
    },

    /// Open an interactive vault session
    Open,

    /// Show account and key status
    Status,

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolved settings plus the directory they are relative to.
pub struct Context {
    pub project_dir: PathBuf,
    pub settings: Settings,
}

impl Context {
    /// Load `.cryptovault.toml` from the working directory and apply the
    /// command-line overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let project_dir = std::env::current_dir()?;
        let mut settings = Settings::load(&project_dir)?;

        if let Some(url) = &cli.api_url {
            settings.api_url = url.clone();
        }
        if let Some(dir) = &cli.data_dir {
            settings.data_dir = dir.clone();
        }
        if let Some(path) = &cli.key_file {
            settings.key_file = path.clone();
        }

        Ok(Self {
            project_dir,
            settings,
        })
    }

    pub fn key_file(&self) -> PathBuf {
        self.settings.key_file_path(&self.project_dir)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.settings.data_dir_path(&self.project_dir)
    }

    /// Connect to the configured store, asking for the API token if needed.
    pub fn connect(&self) -> Result<Vault<HttpCredentialStore>> {
        let token = prompt_token()?;
        let store = HttpCredentialStore::new(
            &self.settings.api_url,
            &token,
            self.settings.request_timeout(),
        );
        Ok(Vault::new(
            store,
            VaultSession::new(self.settings.idle_timeout()),
        ))
    }

    /// Log an audit event for this account. Never fails.
    pub fn audit(&self, op: &str, record_id: Option<&str>, details: Option<&str>) {
        crate::audit::log_audit(
            &self.data_dir(),
            &self.settings.api_url,
            op,
            record_id,
            details,
        );
    }
}

/// Get the API bearer token, trying in order:
/// 1. `CRYPTOVAULT_TOKEN` env var (CI/scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the token is wiped from memory on drop.
pub fn prompt_token() -> Result<Zeroizing<String>> {
    if let Ok(token) = std::env::var("CRYPTOVAULT_TOKEN") {
        if !token.trim().is_empty() {
            return Ok(Zeroizing::new(token.trim().to_string()));
        }
    }

    let token = dialoguer::Password::new()
        .with_prompt("Enter API token")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("token prompt: {e}")))?;
    Ok(Zeroizing::new(token))
}

/// Read the private key file at `path` and unlock `vault` with it.
///
/// Warns when the key does not belong to the account's registered
/// public key.
pub fn unlock_from_file<S: CredentialStore>(
    vault: &mut Vault<S>,
    path: &Path,
) -> Result<UnlockReport> {
    let text = crate::crypto::read_key_file(path)?;
    let report = vault.unlock(&text)?;

    if report.account_match == Some(false) {
        output::warning(
            "This key file does not match the public key registered for the account — \
             newer credentials will not decrypt.",
        );
    }

    Ok(report)
}

/// Reject ids that are obviously not store ids before any network call.
pub fn validate_record_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(VaultError::CommandFailed(
            "credential id cannot be empty".into(),
        ));
    }
    if id.len() > 128 {
        return Err(VaultError::CommandFailed(
            "credential id cannot exceed 128 characters".into(),
        ));
    }
    Ok(())
}
