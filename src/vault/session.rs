//! The vault session: a Locked/Unlocked state machine.
//!
//! `VaultSession` is the only owner of the private key. While Locked no
//! decryption is attempted at all; every reveal fails with
//! `SessionLocked` before the cipher is reached.
//!
//! Each lock bumps a generation counter. A reveal is split into
//! `begin_reveal` (captures the generation and a read-only reference to
//! the key) and `finish_reveal` (stores the plaintext only if the
//! generation is unchanged), so a decrypt that completes after the vault
//! was locked, or re-unlocked with another key, never lands in the cache.
//!
//! An optional idle timeout locks the session on the first access after
//! the configured period of inactivity.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use zeroize::Zeroizing;

use super::reveal::RevealCache;
use crate::crypto::{self, codec, DecryptionKey, EncryptionKey};
use crate::errors::{Result, VaultError};
use crate::store::CredentialRecord;

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Locked,
    Unlocked,
}

/// Result of a reveal toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Revealed,
    Hidden,
}

/// Result of completing an in-flight reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The plaintext was stored in the reveal cache.
    Revealed,
    /// The session changed while the decrypt was in flight; the result
    /// was dropped.
    Discarded,
}

/// An in-flight reveal of one credential.
///
/// The ticket does not own the key. Once the session locks, the key is
/// gone and `decrypt` fails with `SessionLocked`.
pub struct RevealTicket {
    record_id: String,
    ciphertext: String,
    generation: u64,
    key: Weak<DecryptionKey>,
}

impl RevealTicket {
    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    /// Run the decryption. Does not touch the session.
    ///
    /// The key is held only for the duration of this call.
    pub fn decrypt(&self) -> Result<Zeroizing<String>> {
        let key = self.key.upgrade().ok_or(VaultError::SessionLocked)?;
        crypto::decrypt(&self.ciphertext, &key)
    }
}

/// In-memory vault session.
pub struct VaultSession {
    key: Option<Arc<DecryptionKey>>,
    cache: RevealCache,
    generation: u64,
    idle_timeout: Option<Duration>,
    last_activity: Instant,
    decrypt_attempts: u64,
}

impl VaultSession {
    /// A new, locked session. `None` disables the idle timeout.
    pub fn new(idle_timeout: Option<Duration>) -> Self {
        Self {
            key: None,
            cache: RevealCache::new(),
            generation: 0,
            idle_timeout,
            last_activity: Instant::now(),
            decrypt_attempts: 0,
        }
    }

    // ------------------------------------------------------------------
    // State transitions
    // ------------------------------------------------------------------

    /// Import a serialized private key and unlock.
    ///
    /// On failure the session is left exactly as it was and
    /// `InvalidKeyMaterial` is returned. Importing while already unlocked
    /// replaces the key as if `lock` had been called first.
    pub fn import_private_key(&mut self, serialized: &str) -> Result<()> {
        let key = codec::deserialize_private(serialized)?;
        self.unlock_with(key);
        Ok(())
    }

    /// Unlock with an already imported key.
    pub fn unlock_with(&mut self, key: DecryptionKey) {
        if self.key.is_some() {
            self.lock();
        }
        self.key = Some(Arc::new(key));
        self.touch();
    }

    /// Discard the private key and every revealed plaintext.
    ///
    /// Safe to call at any time, including while a reveal is in flight.
    pub fn lock(&mut self) {
        self.key = None;
        self.cache.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Record user activity for the idle timeout.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn idle_expired(&self) -> bool {
        match self.idle_timeout {
            Some(timeout) => self.key.is_some() && self.last_activity.elapsed() >= timeout,
            None => false,
        }
    }

    /// Lock if the idle timeout has elapsed. Returns `true` if it locked.
    pub fn expire_if_idle(&mut self) -> bool {
        if self.idle_expired() {
            self.lock();
            return true;
        }
        false
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        if self.key.is_some() && !self.idle_expired() {
            SessionState::Unlocked
        } else {
            SessionState::Locked
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.state() == SessionState::Unlocked
    }

    /// Incremented on every lock.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Public half of the held key, for checking it against the account.
    pub fn encryption_key(&self) -> Option<EncryptionKey> {
        self.key.as_ref().map(|k| k.encryption_key())
    }

    /// Revealed plaintext of a record, if currently revealed.
    pub fn revealed(&self, id: &str) -> Option<&str> {
        if !self.is_unlocked() {
            return None;
        }
        self.cache.get(id)
    }

    /// Number of records currently revealed. Zero once the session has
    /// locked, including by idle expiry not yet acted on.
    pub fn revealed_count(&self) -> usize {
        if !self.is_unlocked() {
            return 0;
        }
        self.cache.len()
    }

    /// Number of decryptions started over the session's lifetime.
    pub fn decrypt_attempts(&self) -> u64 {
        self.decrypt_attempts
    }

    // ------------------------------------------------------------------
    // Reveal
    // ------------------------------------------------------------------

    /// Reveal a hidden record, or hide a revealed one.
    ///
    /// Hiding never decrypts. A failed decrypt leaves the record hidden
    /// and the session unlocked.
    pub fn toggle_reveal(&mut self, record: &CredentialRecord) -> Result<RevealState> {
        self.expire_if_idle();
        if self.key.is_none() {
            return Err(VaultError::SessionLocked);
        }

        if self.cache.remove(&record.id) {
            self.touch();
            return Ok(RevealState::Hidden);
        }

        let ticket = self.begin_reveal(record)?;
        let result = ticket.decrypt();
        match self.finish_reveal(ticket, result)? {
            RevealOutcome::Revealed => Ok(RevealState::Revealed),
            RevealOutcome::Discarded => Err(VaultError::SessionLocked),
        }
    }

    /// Start revealing `record`. Fails with `SessionLocked` while locked.
    pub fn begin_reveal(&mut self, record: &CredentialRecord) -> Result<RevealTicket> {
        self.expire_if_idle();
        let key = self.key.as_ref().ok_or(VaultError::SessionLocked)?;

        self.decrypt_attempts += 1;
        let ticket = RevealTicket {
            record_id: record.id.clone(),
            ciphertext: record.ciphertext.clone(),
            generation: self.generation,
            key: Arc::downgrade(key),
        };
        self.touch();
        Ok(ticket)
    }

    /// Complete a reveal started with `begin_reveal`.
    ///
    /// If the session was locked since the ticket was issued the result
    /// is dropped, whether it succeeded or not.
    pub fn finish_reveal(
        &mut self,
        ticket: RevealTicket,
        result: Result<Zeroizing<String>>,
    ) -> Result<RevealOutcome> {
        self.expire_if_idle();
        if ticket.generation != self.generation || self.key.is_none() {
            return Ok(RevealOutcome::Discarded);
        }

        let plaintext = result?;
        self.cache.insert(&ticket.record_id, plaintext);
        self.touch();
        Ok(RevealOutcome::Revealed)
    }

    /// Hide one record. Returns `true` if it was revealed.
    pub fn hide(&mut self, id: &str) -> bool {
        self.cache.remove(id)
    }

    /// Drop revealed plaintexts of records that no longer exist.
    pub fn retain_revealed<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.cache.retain_ids(ids);
    }
}

impl Default for VaultSession {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("state", &self.state())
            .field("generation", &self.generation)
            .field("revealed", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::cipher::tests::{other_pair, shared_pair};
    use crate::crypto::{encrypt, serialize_private};

    fn record(id: &str, secret: &str) -> CredentialRecord {
        CredentialRecord {
            id: id.to_string(),
            site: "Netflix".into(),
            login: "user@example.com".into(),
            ciphertext: encrypt(secret, &shared_pair().encryption).unwrap(),
        }
    }

    fn unlocked() -> VaultSession {
        let mut session = VaultSession::new(None);
        let text = serialize_private(&shared_pair().decryption).unwrap();
        session.import_private_key(&text).unwrap();
        session
    }

    #[test]
    fn starts_locked() {
        let session = VaultSession::new(None);
        assert_eq!(session.state(), SessionState::Locked);
        assert!(session.encryption_key().is_none());
    }

    #[test]
    fn locked_reveal_never_reaches_the_cipher() {
        let mut session = VaultSession::new(None);
        // Garbage ciphertext would yield DecryptionFailed if decrypt ran.
        let rec = CredentialRecord {
            id: "1".into(),
            site: "x".into(),
            login: "y".into(),
            ciphertext: "garbage".into(),
        };
        assert!(matches!(
            session.toggle_reveal(&rec),
            Err(VaultError::SessionLocked)
        ));
        assert!(matches!(
            session.begin_reveal(&rec),
            Err(VaultError::SessionLocked)
        ));
        assert_eq!(session.decrypt_attempts(), 0);
    }

    #[test]
    fn invalid_key_keeps_session_locked() {
        let mut session = VaultSession::new(None);
        let result = session.import_private_key("bm90IGEga2V5");
        assert!(matches!(result, Err(VaultError::InvalidKeyMaterial)));
        assert_eq!(session.state(), SessionState::Locked);
    }

    #[test]
    fn invalid_key_while_unlocked_keeps_old_key() {
        let mut session = unlocked();
        let rec = record("1", "secret");
        assert!(session.import_private_key("%%%").is_err());
        assert_eq!(session.toggle_reveal(&rec).unwrap(), RevealState::Revealed);
    }

    #[test]
    fn toggle_reveals_then_hides() {
        let mut session = unlocked();
        let rec = record("1", "Google#Pass!2024");

        assert_eq!(session.toggle_reveal(&rec).unwrap(), RevealState::Revealed);
        assert_eq!(session.revealed("1"), Some("Google#Pass!2024"));

        assert_eq!(session.toggle_reveal(&rec).unwrap(), RevealState::Hidden);
        assert_eq!(session.revealed("1"), None);
        assert_eq!(session.decrypt_attempts(), 1);
    }

    #[test]
    fn failed_decrypt_keeps_session_unlocked_and_record_hidden() {
        let mut session = unlocked();
        let foreign = CredentialRecord {
            id: "9".into(),
            site: "x".into(),
            login: "y".into(),
            ciphertext: encrypt("other", &other_pair().encryption).unwrap(),
        };
        assert!(matches!(
            session.toggle_reveal(&foreign),
            Err(VaultError::DecryptionFailed)
        ));
        assert!(session.is_unlocked());
        assert_eq!(session.revealed("9"), None);
    }

    #[test]
    fn lock_clears_cache_and_forces_new_decrypt() {
        let mut session = unlocked();
        let rec = record("1", "PrimeSecure$99");
        session.toggle_reveal(&rec).unwrap();
        assert_eq!(session.revealed_count(), 1);

        session.lock();
        assert_eq!(session.state(), SessionState::Locked);
        assert_eq!(session.revealed_count(), 0);
        assert_eq!(session.revealed("1"), None);

        let text = serialize_private(&shared_pair().decryption).unwrap();
        session.import_private_key(&text).unwrap();
        assert_eq!(session.toggle_reveal(&rec).unwrap(), RevealState::Revealed);
        assert_eq!(session.decrypt_attempts(), 2);
    }

    #[test]
    fn in_flight_reveal_is_discarded_after_lock() {
        let mut session = unlocked();
        let rec = record("1", "late");

        let ticket = session.begin_reveal(&rec).unwrap();
        session.lock();
        let result = ticket.decrypt();
        assert!(matches!(result, Err(VaultError::SessionLocked)));
        assert_eq!(
            session.finish_reveal(ticket, result).unwrap(),
            RevealOutcome::Discarded
        );
        assert_eq!(session.revealed_count(), 0);
    }

    #[test]
    fn in_flight_reveal_is_discarded_after_relock_with_other_key() {
        let mut session = unlocked();
        let rec = record("1", "stale");

        let ticket = session.begin_reveal(&rec).unwrap();
        let other = serialize_private(&other_pair().decryption).unwrap();
        session.import_private_key(&other).unwrap();

        let result = ticket.decrypt();
        assert!(matches!(result, Err(VaultError::SessionLocked)));
        assert_eq!(
            session.finish_reveal(ticket, result).unwrap(),
            RevealOutcome::Discarded
        );
        assert!(session.is_unlocked());
        assert_eq!(session.revealed("1"), None);
    }

    #[test]
    fn idle_timeout_locks_on_next_access() {
        let mut session = VaultSession::new(Some(Duration::ZERO));
        let text = serialize_private(&shared_pair().decryption).unwrap();
        session.import_private_key(&text).unwrap();

        assert_eq!(session.state(), SessionState::Locked);
        let rec = record("1", "x");
        assert!(matches!(
            session.toggle_reveal(&rec),
            Err(VaultError::SessionLocked)
        ));
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn idle_expired_session_reports_nothing_revealed() {
        let mut session = VaultSession::new(Some(Duration::from_millis(500)));
        let text = serialize_private(&shared_pair().decryption).unwrap();
        session.import_private_key(&text).unwrap();
        session.toggle_reveal(&record("1", "secret")).unwrap();
        assert_eq!(session.revealed_count(), 1);

        std::thread::sleep(Duration::from_millis(700));
        assert_eq!(session.state(), SessionState::Locked);
        assert_eq!(session.revealed_count(), 0);
        assert_eq!(session.revealed("1"), None);
    }

    #[test]
    fn long_idle_timeout_keeps_session_open() {
        let mut session = VaultSession::new(Some(Duration::from_secs(3600)));
        let text = serialize_private(&shared_pair().decryption).unwrap();
        session.import_private_key(&text).unwrap();
        assert!(session.is_unlocked());
        assert!(!session.expire_if_idle());
    }

    #[test]
    fn lock_is_idempotent_and_bumps_generation() {
        let mut session = unlocked();
        let g = session.generation();
        session.lock();
        session.lock();
        assert_eq!(session.generation(), g + 2);
        assert!(!session.is_unlocked());
    }
}
