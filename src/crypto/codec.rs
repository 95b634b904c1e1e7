//! Portable text form of vault keys.
//!
//! Private keys travel as Base64 of their PKCS#8 DER encoding, public
//! keys as Base64 of their SPKI DER encoding. This is the exact content
//! of the downloaded `key.pem` file and of the public key record kept by
//! the credential store.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use super::keys::{DecryptionKey, EncryptionKey, RSA_KEY_BITS};
use crate::errors::{Result, VaultError};

/// Export a private key as Base64 PKCS#8.
///
/// The returned string is key material: it is wrapped in `Zeroizing`
/// so it is wiped once the caller has written it out.
pub fn serialize_private(key: &DecryptionKey) -> Result<Zeroizing<String>> {
    let der = key
        .rsa()
        .to_pkcs8_der()
        .map_err(|e| VaultError::EncodingError(format!("PKCS#8 export failed: {e}")))?;
    Ok(Zeroizing::new(BASE64.encode(der.as_bytes())))
}

/// Export a public key as Base64 SPKI.
pub fn serialize_public(key: &EncryptionKey) -> Result<String> {
    let der = key
        .rsa()
        .to_public_key_der()
        .map_err(|e| VaultError::EncodingError(format!("SPKI export failed: {e}")))?;
    Ok(BASE64.encode(der.as_bytes()))
}

/// Import a private key from its text form. The handle is decrypt-only.
///
/// Any failure (bad Base64, bad DER, undersized modulus) is reported as
/// `InvalidKeyMaterial`; the underlying cause is not surfaced.
pub fn deserialize_private(text: &str) -> Result<DecryptionKey> {
    let der = Zeroizing::new(decode_base64(text)?);
    let key = RsaPrivateKey::from_pkcs8_der(&der).map_err(|_| VaultError::InvalidKeyMaterial)?;
    if key.size() * 8 < RSA_KEY_BITS {
        return Err(VaultError::InvalidKeyMaterial);
    }
    Ok(DecryptionKey::from_rsa(key))
}

/// Import a public key from its text form. The handle is encrypt-only.
pub fn deserialize_public(text: &str) -> Result<EncryptionKey> {
    let der = decode_base64(text)?;
    let key =
        RsaPublicKey::from_public_key_der(&der).map_err(|_| VaultError::InvalidKeyMaterial)?;
    if key.size() * 8 < RSA_KEY_BITS {
        return Err(VaultError::InvalidKeyMaterial);
    }
    Ok(EncryptionKey::from_rsa(key))
}

fn decode_base64(text: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(text.trim())
        .map_err(|_| VaultError::InvalidKeyMaterial)
}
