//! Display helpers for credential records and the sample entries offered
//! right after key generation.

use std::fmt;

/// Rough category of a site label, used to pick an icon in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    Mail,
    Shopping,
    Web,
}

impl SiteKind {
    /// Classify a site by its (case-insensitive) label.
    pub fn classify(site: &str) -> Self {
        let s = site.to_lowercase();
        if s.contains("mail") {
            SiteKind::Mail
        } else if s.contains("amazon") || s.contains("shop") {
            SiteKind::Shopping
        } else {
            SiteKind::Web
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SiteKind::Mail => "\u{2709}",
            SiteKind::Shopping => "\u{1f6cd}",
            SiteKind::Web => "\u{1f310}",
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SiteKind::Mail => "mail",
            SiteKind::Shopping => "shopping",
            SiteKind::Web => "web",
        };
        f.write_str(name)
    }
}

/// A demo credential, encrypted and stored by `init --with-samples`.
#[derive(Debug, Clone, Copy)]
pub struct SampleCredential {
    pub site: &'static str,
    pub login: &'static str,
    pub password: &'static str,
}

/// Entries seeded into a fresh vault so a new user has something to
/// reveal straight away.
pub const SAMPLE_CREDENTIALS: [SampleCredential; 3] = [
    SampleCredential {
        site: "Netflix",
        login: "utilizador@exemplo.com",
        password: "Senha@Netflix123",
    },
    SampleCredential {
        site: "Gmail",
        login: "teste.seguro@gmail.com",
        password: "Google#Pass!2024",
    },
    SampleCredential {
        site: "Amazon",
        login: "comprador_online",
        password: "PrimeSecure$99",
    },
];

/// Validate user-entered site and login labels.
///
/// Both must be non-empty after trimming; the store has no use for
/// blank entries.
pub fn validate_entry(site: &str, login: &str) -> crate::errors::Result<()> {
    if site.trim().is_empty() {
        return Err(crate::errors::VaultError::CommandFailed(
            "site cannot be empty".into(),
        ));
    }
    if login.trim().is_empty() {
        return Err(crate::errors::VaultError::CommandFailed(
            "login cannot be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_sites() {
        assert_eq!(SiteKind::classify("Gmail"), SiteKind::Mail);
        assert_eq!(SiteKind::classify("ProtonMail"), SiteKind::Mail);
        assert_eq!(SiteKind::classify("Amazon"), SiteKind::Shopping);
        assert_eq!(SiteKind::classify("Etsy Shop"), SiteKind::Shopping);
        assert_eq!(SiteKind::classify("Netflix"), SiteKind::Web);
    }

    #[test]
    fn samples_fit_in_one_rsa_block() {
        for sample in SAMPLE_CREDENTIALS {
            assert!(sample.password.len() <= 190);
        }
    }

    #[test]
    fn blank_entries_are_rejected() {
        assert!(validate_entry("Gmail", "me").is_ok());
        assert!(validate_entry("  ", "me").is_err());
        assert!(validate_entry("Gmail", "").is_err());
    }
}
