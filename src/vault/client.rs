//! High-level vault operations used by CLI commands.
//!
//! `Vault` ties the crypto layer, the session and a `CredentialStore`
//! together and keeps the local view of the credential list. Writes are
//! two-phase: the change is applied locally, the store is called, and the
//! local change is rolled back if the store refuses it.

use zeroize::Zeroizing;

use super::credential::{validate_entry, SAMPLE_CREDENTIALS};
use super::session::{RevealState, VaultSession};
use crate::crypto::{self, EncryptionKey, KeyFingerprint};
use crate::errors::{Result, VaultError};
use crate::store::{AccountStats, CredentialRecord, CredentialStore, NewCredential};

/// Prefix of ids given to records not yet confirmed by the store.
pub const PENDING_ID_PREFIX: &str = "pending-";

/// Whether the local list reflects the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    /// The store could not be read; the list shown is the last known one.
    Stale { notice: String },
}

/// Output of key generation. Holds the only copy of the private key text.
pub struct Registration {
    pub private_key: Zeroizing<String>,
    pub encryption_key: EncryptionKey,
    pub fingerprint: KeyFingerprint,
}

/// Output of a successful unlock.
#[derive(Debug, Clone)]
pub struct UnlockReport {
    /// Fingerprint of the public half of the loaded key.
    pub fingerprint: KeyFingerprint,
    /// `Some(false)` when the account is registered with a different
    /// public key; `None` when that could not be checked.
    pub account_match: Option<bool>,
}

/// Account overview for `status`.
#[derive(Debug, Clone)]
pub struct AccountStatus {
    pub stats: AccountStats,
    pub fingerprint: Option<KeyFingerprint>,
}

/// The main vault handle.
pub struct Vault<S: CredentialStore> {
    store: S,
    session: VaultSession,
    records: Vec<CredentialRecord>,
    pending_seq: u64,
}

impl<S: CredentialStore> Vault<S> {
    pub fn new(store: S, session: VaultSession) -> Self {
        Self {
            store,
            session,
            records: Vec::new(),
            pending_seq: 0,
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Generate a key pair and register its public half with the store.
    ///
    /// Refuses (unless `force`) when the account already holds
    /// credentials, since they were encrypted under the previous key.
    /// The private key is returned to the caller and not kept.
    pub fn initialize_keys(&mut self, force: bool) -> Result<Registration> {
        let registration = self.prepare_keys(force)?;
        self.register_keys(&registration)?;
        Ok(registration)
    }

    /// First half of `initialize_keys`: check the account and generate a
    /// key pair, without registering anything.
    ///
    /// Lets the caller persist the private key before the account starts
    /// using the new public key.
    pub fn prepare_keys(&mut self, force: bool) -> Result<Registration> {
        let stats = self.store.stats()?;
        if stats.total_credentials > 0 && !force {
            return Err(VaultError::AlreadyInitialized(stats.total_credentials));
        }

        let pair = crypto::generate_key_pair()?;
        let private_key = crypto::serialize_private(&pair.decryption)?;
        let fingerprint = pair.encryption.fingerprint()?;

        Ok(Registration {
            private_key,
            encryption_key: pair.encryption,
            fingerprint,
        })
    }

    /// Second half of `initialize_keys`: upsert the public key.
    pub fn register_keys(&mut self, registration: &Registration) -> Result<()> {
        let public_text = crypto::serialize_public(&registration.encryption_key)?;
        self.store.upsert_public_key(&public_text)?;
        Ok(())
    }

    /// Encrypt and store the demo entries. Returns how many were stored.
    pub fn seed_samples(&mut self, key: &EncryptionKey) -> Result<usize> {
        for sample in SAMPLE_CREDENTIALS {
            let ciphertext = crypto::encrypt(sample.password, key)?;
            self.store.create_credential(&NewCredential {
                site: sample.site.to_string(),
                login: sample.login.to_string(),
                ciphertext,
            })?;
        }
        self.refresh();
        Ok(SAMPLE_CREDENTIALS.len())
    }

    /// Account statistics and the registered key's fingerprint.
    pub fn account_status(&mut self) -> Result<AccountStatus> {
        let stats = self.store.stats()?;
        let fingerprint = match self.store.current_public_key()? {
            Some(text) => Some(crypto::deserialize_public(&text)?.fingerprint()?),
            None => None,
        };
        Ok(AccountStatus { stats, fingerprint })
    }

    // ------------------------------------------------------------------
    // Credential list
    // ------------------------------------------------------------------

    /// Reload the list from the store.
    ///
    /// A failed read keeps the previous list and reports it as stale.
    pub fn refresh(&mut self) -> Freshness {
        match self.store.list_credentials() {
            Ok(records) => {
                self.records = records;
                self.session
                    .retain_revealed(self.records.iter().map(|r| r.id.as_str()));
                Freshness::Fresh
            }
            Err(e) => Freshness::Stale {
                notice: e.to_string(),
            },
        }
    }

    /// Encrypt `password` under the account's public key and store it.
    ///
    /// The entry is shown locally as pending until the store confirms;
    /// if the store refuses, it is removed again and the error returned.
    pub fn add_credential(&mut self, site: &str, login: &str, password: &str) -> Result<Freshness> {
        validate_entry(site, login)?;

        let public_text = self
            .store
            .current_public_key()?
            .ok_or(VaultError::PublicKeyMissing)?;
        let key = crypto::deserialize_public(&public_text)?;
        let ciphertext = crypto::encrypt(password, &key)?;

        let new = NewCredential {
            site: site.trim().to_string(),
            login: login.trim().to_string(),
            ciphertext,
        };

        self.pending_seq += 1;
        let pending_id = format!("{PENDING_ID_PREFIX}{}", self.pending_seq);
        self.records.insert(
            0,
            CredentialRecord {
                id: pending_id.clone(),
                site: new.site.clone(),
                login: new.login.clone(),
                ciphertext: new.ciphertext.clone(),
            },
        );

        if let Err(e) = self.store.create_credential(&new) {
            self.records.retain(|r| r.id != pending_id);
            return Err(e);
        }

        Ok(self.refresh())
    }

    /// Delete a credential, restoring it locally if the store refuses.
    pub fn delete_credential(&mut self, id: &str) -> Result<()> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| VaultError::CredentialNotFound(id.to_string()))?;
        let removed = self.records.remove(index);

        if let Err(e) = self.store.delete_credential(id) {
            self.records.insert(index, removed);
            return Err(e);
        }

        self.session.hide(id);
        Ok(())
    }

    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Option<&CredentialRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Unlock with the text of a private key file.
    ///
    /// Also checks the key against the account's registered public key
    /// when the store can be reached. A mismatch is reported, not
    /// rejected: credentials from an older key may still be readable.
    pub fn unlock(&mut self, private_key_text: &str) -> Result<UnlockReport> {
        self.session.import_private_key(private_key_text)?;

        let public = self
            .session
            .encryption_key()
            .ok_or(VaultError::SessionLocked)?;
        let fingerprint = public.fingerprint()?;

        let account_match = self
            .store
            .current_public_key()
            .ok()
            .flatten()
            .and_then(|text| crypto::deserialize_public(&text).ok())
            .and_then(|registered| registered.fingerprint().ok())
            .map(|registered| registered.matches(&fingerprint));

        Ok(UnlockReport {
            fingerprint,
            account_match,
        })
    }

    pub fn lock(&mut self) {
        self.session.lock();
    }

    /// Reveal or hide one credential.
    pub fn toggle_reveal(&mut self, id: &str) -> Result<RevealState> {
        let record = self
            .records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| VaultError::CredentialNotFound(id.to_string()))?;
        self.session.toggle_reveal(record)
    }

    pub fn revealed(&self, id: &str) -> Option<&str> {
        self.session.revealed(id)
    }

    pub fn session(&self) -> &VaultSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut VaultSession {
        &mut self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
