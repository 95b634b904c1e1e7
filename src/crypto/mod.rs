//! Cryptographic primitives for CryptoVault.
//!
//! This module provides:
//! - Capability-split RSA key handles and fingerprints (`keys`)
//! - RSA-OAEP-SHA256 key generation, encryption and decryption (`cipher`)
//! - Base64 PKCS#8 / SPKI text encoding of keys (`codec`)
//! - The private key file written after key generation (`keyfile`)

pub mod cipher;
pub mod codec;
pub mod keyfile;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, generate_key_pair, ...};
pub use cipher::{decrypt, encrypt, generate_key_pair};
pub use codec::{deserialize_private, deserialize_public, serialize_private, serialize_public};
pub use keyfile::{load_private_key, read_key_file, write_key_file, DEFAULT_KEY_FILE};
pub use keys::{DecryptionKey, EncryptionKey, KeyFingerprint, KeyPair};
