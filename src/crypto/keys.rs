//! Capability-restricted RSA key handles.
//!
//! An `EncryptionKey` wraps the public half and can only encrypt.
//! A `DecryptionKey` wraps the private half and can only decrypt.
//! Neither type exposes the other capability, so a handle can never be
//! used for the wrong operation.
//!
//! The inner `rsa::RsaPrivateKey` zeroizes its limbs on drop.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rsa::pkcs8::EncodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::{Result, VaultError};

/// Length of the SHA-256 digest used as OAEP hash (bytes).
pub const OAEP_HASH_LEN: usize = 32;

/// Modulus size for freshly generated keys (bits).
pub const RSA_KEY_BITS: usize = 2048;

/// Public half of a vault key pair. Encrypt-only.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey {
    inner: RsaPublicKey,
}

/// Private half of a vault key pair. Decrypt-only.
pub struct DecryptionKey {
    inner: RsaPrivateKey,
}

/// A freshly generated key pair, split by capability.
pub struct KeyPair {
    pub encryption: EncryptionKey,
    pub decryption: DecryptionKey,
}

impl EncryptionKey {
    pub(crate) fn from_rsa(inner: RsaPublicKey) -> Self {
        Self { inner }
    }

    pub(crate) fn rsa(&self) -> &RsaPublicKey {
        &self.inner
    }

    /// Modulus size in bytes.
    pub fn modulus_len(&self) -> usize {
        self.inner.size()
    }

    /// Largest plaintext RSA-OAEP-SHA256 can carry under this key:
    /// `k - 2*hLen - 2` (190 bytes for a 2048-bit modulus).
    pub fn max_plaintext_len(&self) -> usize {
        self.modulus_len().saturating_sub(2 * OAEP_HASH_LEN + 2)
    }

    /// SHA-256 fingerprint of the SPKI DER encoding, Base64-encoded.
    pub fn fingerprint(&self) -> Result<KeyFingerprint> {
        let der = self
            .inner
            .to_public_key_der()
            .map_err(|e| VaultError::EncodingError(format!("SPKI export failed: {e}")))?;
        Ok(KeyFingerprint(BASE64.encode(Sha256::digest(der.as_bytes()))))
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("bits", &(self.modulus_len() * 8))
            .finish()
    }
}

impl DecryptionKey {
    pub(crate) fn from_rsa(inner: RsaPrivateKey) -> Self {
        Self { inner }
    }

    pub(crate) fn rsa(&self) -> &RsaPrivateKey {
        &self.inner
    }

    /// Derive the matching public half.
    ///
    /// Used to check a loaded key file against the account's registered
    /// public key; the private handle itself stays decrypt-only.
    pub fn encryption_key(&self) -> EncryptionKey {
        EncryptionKey::from_rsa(self.inner.to_public_key())
    }
}

impl std::fmt::Debug for DecryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DecryptionKey(<redacted>)")
    }
}

/// Base64 SHA-256 digest of a public key's SPKI encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFingerprint(String);

impl KeyFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare two fingerprints in constant time.
    pub fn matches(&self, other: &KeyFingerprint) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl std::fmt::Display for KeyFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::cipher::tests::shared_pair;

    #[test]
    fn max_plaintext_for_2048_bit_key_is_190() {
        let pair = shared_pair();
        assert_eq!(pair.encryption.modulus_len(), 256);
        assert_eq!(pair.encryption.max_plaintext_len(), 190);
    }

    #[test]
    fn derived_public_half_has_same_fingerprint() {
        let pair = shared_pair();
        let derived = pair.decryption.encryption_key();
        let a = pair.encryption.fingerprint().unwrap();
        let b = derived.fingerprint().unwrap();
        assert!(a.matches(&b));
        assert_eq!(derived, pair.encryption);
    }

    #[test]
    fn debug_output_never_shows_private_material() {
        let pair = shared_pair();
        let shown = format!("{:?}", pair.decryption);
        assert_eq!(shown, "DecryptionKey(<redacted>)");
    }
}
