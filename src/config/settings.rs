use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};

/// Project-level configuration, loaded from `.cryptovault.toml`.
///
/// Every field has a sensible default so CryptoVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the credential store API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Directory (relative to the working directory) for local state
    /// such as the audit log.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Where the private key file is written and looked up.
    #[serde(default = "default_key_file")]
    pub key_file: String,

    /// Lock an idle interactive session after this many seconds
    /// (0 disables the timeout).
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Timeout for a single request to the store, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_data_dir() -> String {
    ".cryptovault".to_string()
}

fn default_key_file() -> String {
    crate::crypto::DEFAULT_KEY_FILE.to_string()
}

fn default_idle_timeout_secs() -> u64 {
    300 // 5 minutes
}

fn default_request_timeout_secs() -> u64 {
    30
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            data_dir: default_data_dir(),
            key_file: default_key_file(),
            idle_timeout_secs: default_idle_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".cryptovault.toml";

    /// Load settings from `<project_dir>/.cryptovault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(VaultError::ConfigError(format!(
                "api_url '{}' must start with http:// or https://",
                self.api_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(VaultError::ConfigError(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Idle timeout for the session, or `None` when disabled.
    pub fn idle_timeout(&self) -> Option<Duration> {
        match self.idle_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolve the key file path against the project directory.
    pub fn key_file_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.key_file)
    }

    /// Resolve the data directory against the project directory.
    pub fn data_dir_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.data_dir)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
