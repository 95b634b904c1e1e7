//! RSA-OAEP (SHA-256) public-key encryption of vault secrets.
//!
//! `encrypt` maps a UTF-8 secret to Base64 ciphertext under the account's
//! public key; `decrypt` reverses it with the private key. OAEP is
//! randomized, so two encryptions of the same secret never match.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rsa::rand_core::OsRng;
use rsa::{Oaep, RsaPrivateKey};
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use super::keys::{DecryptionKey, EncryptionKey, KeyPair, RSA_KEY_BITS};
use crate::errors::{Result, VaultError};

/// Generate a fresh 2048-bit key pair (e = 65537).
pub fn generate_key_pair() -> Result<KeyPair> {
    let private = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
        .map_err(|e| VaultError::KeyGenerationFailed(e.to_string()))?;
    let public = private.to_public_key();

    Ok(KeyPair {
        encryption: EncryptionKey::from_rsa(public),
        decryption: DecryptionKey::from_rsa(private),
    })
}

/// Encrypt `plaintext` under `key` and return the Base64 ciphertext.
///
/// Secrets longer than the OAEP payload limit are rejected with
/// `PayloadTooLarge` instead of being truncated.
pub fn encrypt(plaintext: &str, key: &EncryptionKey) -> Result<String> {
    let bytes = plaintext.as_bytes();
    let max = key.max_plaintext_len();
    if bytes.len() > max {
        return Err(VaultError::PayloadTooLarge {
            len: bytes.len(),
            max,
        });
    }

    let ciphertext = key
        .rsa()
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), bytes)
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;

    Ok(BASE64.encode(ciphertext))
}

/// Decrypt Base64 ciphertext produced by `encrypt`.
///
/// Every failure mode (bad Base64, padding mismatch, wrong key, output
/// that is not UTF-8) collapses into `DecryptionFailed`.
pub fn decrypt(ciphertext_b64: &str, key: &DecryptionKey) -> Result<Zeroizing<String>> {
    let ciphertext = BASE64
        .decode(ciphertext_b64.trim())
        .map_err(|_| VaultError::DecryptionFailed)?;

    let plaintext = key
        .rsa()
        .decrypt(Oaep::new::<Sha256>(), &ciphertext)
        .map_err(|_| VaultError::DecryptionFailed)?;

    // On error, zeroize the bytes inside the error before discarding.
    String::from_utf8(plaintext).map(Zeroizing::new).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        VaultError::DecryptionFailed
    })
}
