//! In-memory credential store.
//!
//! Behaves like the REST store (single upserted public key, server-side
//! ids, stats) and can be told to fail the next write, which is how the
//! rollback paths of `Vault` are exercised.

use super::{AccountStats, CredentialRecord, CredentialStore, NewCredential, PublicKeyRecord};
use crate::errors::{Result, VaultError};

/// A `CredentialStore` that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    public_key: Option<String>,
    records: Vec<CredentialRecord>,
    next_id: u64,
    fail_writes: bool,
    fail_reads: bool,
    /// Number of calls made against the store, by any method.
    pub calls: usize,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write (create, delete, upsert) fail.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Make every subsequent read (list, stats, public key) fail.
    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Records as the server sees them.
    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    fn read(&mut self) -> Result<()> {
        self.calls += 1;
        if self.fail_reads {
            return Err(VaultError::RemoteStore("simulated read failure".into()));
        }
        Ok(())
    }

    fn write(&mut self) -> Result<()> {
        self.calls += 1;
        if self.fail_writes {
            return Err(VaultError::RemoteStore("simulated write failure".into()));
        }
        Ok(())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn public_keys(&mut self) -> Result<Vec<PublicKeyRecord>> {
        self.read()?;
        Ok(self
            .public_key
            .iter()
            .map(|k| PublicKeyRecord {
                public_key: k.clone(),
            })
            .collect())
    }

    fn upsert_public_key(&mut self, serialized_public: &str) -> Result<Vec<PublicKeyRecord>> {
        self.write()?;
        self.public_key = Some(serialized_public.to_string());
        Ok(vec![PublicKeyRecord {
            public_key: serialized_public.to_string(),
        }])
    }

    fn list_credentials(&mut self) -> Result<Vec<CredentialRecord>> {
        self.read()?;
        // Newest first, like the web client's list.
        Ok(self.records.iter().rev().cloned().collect())
    }

    fn create_credential(&mut self, credential: &NewCredential) -> Result<()> {
        self.write()?;
        self.next_id += 1;
        self.records.push(CredentialRecord {
            id: self.next_id.to_string(),
            site: credential.site.clone(),
            login: credential.login.clone(),
            ciphertext: credential.ciphertext.clone(),
        });
        Ok(())
    }

    fn delete_credential(&mut self, id: &str) -> Result<()> {
        self.write()?;
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Err(VaultError::RemoteStore(format!(
                "DELETE /private/credentials/{id}: server returned 404"
            )));
        }
        Ok(())
    }

    fn stats(&mut self) -> Result<AccountStats> {
        self.read()?;
        Ok(AccountStats {
            total_credentials: self.records.len() as u64,
        })
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
