//! The remote credential store contract.
//!
//! The server is a blind store: it keeps one public key per account and
//! a list of credential records whose password field is ciphertext. It
//! never sees plaintext or private key material.
//!
//! This module provides:
//! - Wire types shared by every implementation
//! - The `CredentialStore` trait
//! - A blocking HTTP implementation (`http`)
//! - An in-memory implementation for tests and demos (`memory`)

pub mod http;
pub mod memory;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::Result;

pub use http::HttpCredentialStore;
pub use memory::MemoryCredentialStore;

/// One stored credential as returned by `GET /private/credentials`.
///
/// `ciphertext` is Base64 RSA-OAEP output; the store calls it `password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub site: String,
    pub login: String,
    #[serde(rename = "password")]
    pub ciphertext: String,
}

/// Body of `POST /private/credentials`.
///
/// The store names the login field `email` on the way in but returns it
/// as `login`; both spellings are kept as the server expects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCredential {
    pub site: String,
    #[serde(rename = "email")]
    pub login: String,
    #[serde(rename = "password")]
    pub ciphertext: String,
}

/// The account's registered public key, as returned by
/// `GET /private/publickey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyRecord {
    pub public_key: String,
}

/// Body of `PUT /private/publickey`.
#[derive(Debug, Clone, Serialize)]
pub struct PublicKeyUpload<'a> {
    pub key: &'a str,
}

/// `GET /private/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub total_credentials: u64,
}

/// Everything the vault needs from the remote store.
///
/// Every method maps transport and server failures to
/// `VaultError::RemoteStore`.
pub trait CredentialStore {
    /// Current public key records for the account (at most one expected).
    fn public_keys(&mut self) -> Result<Vec<PublicKeyRecord>>;

    /// Insert or replace the account's public key. Idempotent.
    fn upsert_public_key(&mut self, serialized_public: &str) -> Result<Vec<PublicKeyRecord>>;

    /// All credential records of the account.
    fn list_credentials(&mut self) -> Result<Vec<CredentialRecord>>;

    /// Create a credential record.
    fn create_credential(&mut self, credential: &NewCredential) -> Result<()>;

    /// Remove a credential record.
    fn delete_credential(&mut self, id: &str) -> Result<()>;

    /// Account statistics.
    fn stats(&mut self) -> Result<AccountStats>;

    /// Short label for audit entries and messages (e.g. the API host).
    fn describe(&self) -> String;

    /// The account's current public key, if one is registered.
    fn current_public_key(&mut self) -> Result<Option<String>> {
        Ok(self.public_keys()?.into_iter().next().map(|r| r.public_key))
    }
}

/// Servers disagree on whether ids are numbers or strings.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accepts_numeric_and_string_ids() {
        let json = r#"[
            {"id": 17, "site": "Gmail", "login": "a@b.c", "password": "Y3Q="},
            {"id": "abc", "site": "Amazon", "login": "buyer", "password": "Y3Q="}
        ]"#;
        let records: Vec<CredentialRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].id, "17");
        assert_eq!(records[1].id, "abc");
        assert_eq!(records[0].ciphertext, "Y3Q=");
    }

    #[test]
    fn new_credential_uses_server_field_names() {
        let body = NewCredential {
            site: "Netflix".into(),
            login: "user@example.com".into(),
            ciphertext: "Y3Q=".into(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["email"], "user@example.com");
        assert_eq!(value["password"], "Y3Q=");
        assert!(value.get("login").is_none());
    }

    #[test]
    fn stats_and_public_key_are_camel_case() {
        let stats: AccountStats = serde_json::from_str(r#"{"totalCredentials": 3}"#).unwrap();
        assert_eq!(stats.total_credentials, 3);

        let keys: Vec<PublicKeyRecord> =
            serde_json::from_str(r#"[{"publicKey": "MIIB"}]"#).unwrap();
        assert_eq!(keys[0].public_key, "MIIB");
    }
}
