//! Blocking HTTP client for the REST credential store.
//!
//! Every request carries `Authorization: Bearer <token>`. Non-2xx
//! responses and transport failures become `VaultError::RemoteStore`.

use std::time::Duration;

use serde::de::DeserializeOwned;
use ureq::Agent;
use url::Url;
use zeroize::Zeroizing;

use super::{
    AccountStats, CredentialRecord, CredentialStore, NewCredential, PublicKeyRecord,
    PublicKeyUpload,
};
use crate::errors::{Result, VaultError};

/// REST implementation of `CredentialStore`.
pub struct HttpCredentialStore {
    agent: Agent,
    base_url: String,
    auth_header: Zeroizing<String>,
}

impl HttpCredentialStore {
    /// Build a client for `base_url` (e.g. `https://api.example.com`).
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();

        Self {
            agent: config.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: Zeroizing::new(format!("Bearer {token}")),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `<base>/private/credentials/<id>`, with `id` encoded as a single
    /// path segment.
    fn record_url(&self, id: &str) -> Result<Url> {
        let invalid = || VaultError::RemoteStore(format!("invalid store URL '{}'", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(["private", "credentials", id]);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let mut resp = self
            .agent
            .get(&self.url(path))
            .header("Authorization", self.auth_header.as_str())
            .call()
            .map_err(|e| remote_error("GET", path, &e))?;

        resp.body_mut()
            .read_json::<T>()
            .map_err(|e| VaultError::RemoteStore(format!("GET {path}: malformed response: {e}")))
    }
}

impl CredentialStore for HttpCredentialStore {
    fn public_keys(&mut self) -> Result<Vec<PublicKeyRecord>> {
        self.get_json("/private/publickey")
    }

    fn upsert_public_key(&mut self, serialized_public: &str) -> Result<Vec<PublicKeyRecord>> {
        let path = "/private/publickey";
        let mut resp = self
            .agent
            .put(&self.url(path))
            .header("Authorization", self.auth_header.as_str())
            .send_json(PublicKeyUpload {
                key: serialized_public,
            })
            .map_err(|e| remote_error("PUT", path, &e))?;

        // Some deployments answer with no body at all; the upsert still
        // happened. Anything else must be a valid record set.
        if resp.status() == ureq::http::StatusCode::NO_CONTENT || declares_empty_body(&resp) {
            return Ok(Vec::new());
        }
        resp.body_mut()
            .read_json::<Vec<PublicKeyRecord>>()
            .map_err(|e| VaultError::RemoteStore(format!("PUT {path}: malformed response: {e}")))
    }

    fn list_credentials(&mut self) -> Result<Vec<CredentialRecord>> {
        self.get_json("/private/credentials")
    }

    fn create_credential(&mut self, credential: &NewCredential) -> Result<()> {
        let path = "/private/credentials";
        self.agent
            .post(&self.url(path))
            .header("Authorization", self.auth_header.as_str())
            .send_json(credential)
            .map_err(|e| remote_error("POST", path, &e))?;
        Ok(())
    }

    fn delete_credential(&mut self, id: &str) -> Result<()> {
        let url = self.record_url(id)?;
        self.agent
            .delete(url.as_str())
            .header("Authorization", self.auth_header.as_str())
            .call()
            .map_err(|e| remote_error("DELETE", url.path(), &e))?;
        Ok(())
    }

    fn stats(&mut self) -> Result<AccountStats> {
        self.get_json("/private/stats")
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

fn remote_error(method: &str, path: &str, err: &ureq::Error) -> VaultError {
    match err {
        ureq::Error::StatusCode(401 | 403) => VaultError::RemoteStore(format!(
            "{method} {path}: not authorized — check your API token"
        )),
        ureq::Error::StatusCode(code) => {
            VaultError::RemoteStore(format!("{method} {path}: server returned {code}"))
        }
        other => VaultError::RemoteStore(format!("{method} {path}: {other}")),
    }
}

fn declares_empty_body(resp: &ureq::http::Response<ureq::Body>) -> bool {
    resp.headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let store = HttpCredentialStore::new("http://localhost:3000/", "t", Duration::from_secs(1));
        assert_eq!(store.url("/private/stats"), "http://localhost:3000/private/stats");
        assert_eq!(store.describe(), "http://localhost:3000");
    }

    #[test]
    fn record_url_encodes_id_as_one_segment() {
        let store = HttpCredentialStore::new("http://localhost:3000", "t", Duration::from_secs(1));
        assert_eq!(
            store.record_url("abc-123").unwrap().as_str(),
            "http://localhost:3000/private/credentials/abc-123"
        );
        assert_eq!(
            store.record_url("a/b c").unwrap().path(),
            "/private/credentials/a%2Fb%20c"
        );
    }

    #[test]
    fn record_url_keeps_base_path() {
        let store = HttpCredentialStore::new("https://vault.example.com/api/", "t", Duration::from_secs(1));
        assert_eq!(
            store.record_url("7").unwrap().as_str(),
            "https://vault.example.com/api/private/credentials/7"
        );
    }

    #[test]
    fn record_url_rejects_unparseable_base() {
        let store = HttpCredentialStore::new("not a url", "t", Duration::from_secs(1));
        assert!(matches!(store.record_url("7"), Err(VaultError::RemoteStore(_))));
    }
}
