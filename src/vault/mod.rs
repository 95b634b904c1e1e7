//! Vault module — session state and credential operations.
//!
//! This module provides:
//! - The Locked/Unlocked `VaultSession` (`session`)
//! - The transient `RevealCache` of decrypted values (`reveal`)
//! - Site classification and sample entries (`credential`)
//! - The high-level `Vault` that runs the key distribution protocol
//!   against a credential store (`client`)

pub mod client;
pub mod credential;
pub mod reveal;
pub mod session;

// Re-export the most commonly used items.
pub use client::{AccountStatus, Freshness, Registration, UnlockReport, Vault};
pub use credential::{SiteKind, SAMPLE_CREDENTIALS};
pub use reveal::RevealCache;
pub use session::{RevealOutcome, RevealState, RevealTicket, SessionState, VaultSession};
