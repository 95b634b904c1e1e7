//! The private key file handed to the user after key generation.
//!
//! The file is conventionally named `key.pem` but holds raw Base64 of the
//! PKCS#8 DER encoding, with no PEM header or footer lines. Files already
//! downloaded by existing users look exactly like this, so the format is
//! kept byte-for-byte: the Base64 text and nothing else, no trailing
//! newline.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use zeroize::Zeroizing;

use super::codec;
use super::keys::DecryptionKey;
use crate::errors::{Result, VaultError};

/// Default file name offered for the private key.
pub const DEFAULT_KEY_FILE: &str = "key.pem";

/// Upper bound on a key file we are willing to read (a 4096-bit PKCS#8
/// key is well under 4 KiB once Base64-encoded).
const MAX_KEY_FILE_LEN: u64 = 16 * 1024;

/// Write the serialized private key to `path`.
///
/// Refuses to overwrite an existing file: losing the previous key file
/// makes every credential encrypted under it unreadable.
pub fn write_key_file(path: &Path, serialized_private: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                VaultError::KeyFileError(format!("cannot create key file directory: {e}"))
            })?;
        }
    }

    // Created exclusively, owner-only from the first byte.
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => {
            VaultError::KeyFileError(format!("key file already exists at {}", path.display()))
        }
        _ => VaultError::KeyFileError(format!("failed to create key file: {e}")),
    })?;

    file.write_all(serialized_private.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| VaultError::KeyFileError(format!("failed to write key file: {e}")))?;

    Ok(())
}

/// Read the raw text of a key file.
pub fn read_key_file(path: &Path) -> Result<Zeroizing<String>> {
    if !path.exists() {
        return Err(VaultError::KeyFileError(format!(
            "key file not found at {}",
            path.display()
        )));
    }

    let len = fs::metadata(path)?.len();
    if len > MAX_KEY_FILE_LEN {
        return Err(VaultError::InvalidKeyMaterial);
    }

    let text = fs::read_to_string(path).map_err(|_| VaultError::InvalidKeyMaterial)?;
    Ok(Zeroizing::new(text))
}

/// Read and import a private key file in one step.
pub fn load_private_key(path: &Path) -> Result<DecryptionKey> {
    let text = read_key_file(path)?;
    codec::deserialize_private(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::cipher::tests::shared_pair;
    use tempfile::TempDir;

    #[test]
    fn write_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_KEY_FILE);
        let text = codec::serialize_private(&shared_pair().decryption).unwrap();

        write_key_file(&path, &text).unwrap();
        let loaded = load_private_key(&path).unwrap();
        assert_eq!(loaded.encryption_key(), shared_pair().encryption);
    }

    #[test]
    fn file_content_is_bare_base64() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_KEY_FILE);
        let text = codec::serialize_private(&shared_pair().decryption).unwrap();

        write_key_file(&path, &text).unwrap();
        let on_disk = fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, *text);
        assert!(!on_disk.contains("-----BEGIN"));
    }

    #[test]
    fn write_fails_if_exists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_KEY_FILE);
        write_key_file(&path, "AAAA").unwrap();
        match write_key_file(&path, "BBBB") {
            Err(VaultError::KeyFileError(msg)) => assert!(msg.contains("already exists")),
            other => panic!("expected KeyFileError, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "AAAA");
    }

    #[test]
    fn read_fails_if_missing() {
        let dir = TempDir::new().unwrap();
        let result = read_key_file(&dir.path().join("missing.pem"));
        assert!(matches!(result, Err(VaultError::KeyFileError(_))));
    }

    #[test]
    fn corrupted_file_is_invalid_key_material() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_KEY_FILE);
        fs::write(&path, "MIIEvQIBADANBgkqhkiG9w0BAQEFAASC").unwrap();
        assert!(matches!(
            load_private_key(&path),
            Err(VaultError::InvalidKeyMaterial)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn key_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_KEY_FILE);
        write_key_file(&path, "AAAA").unwrap();

        let perms = fs::metadata(&path).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn key_file_in_new_directory_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o777)).unwrap();
        let path = dir.path().join("nested").join(DEFAULT_KEY_FILE);
        write_key_file(&path, "AAAA").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & 0o077, 0, "group/other bits set: {mode:o}");
    }
}
