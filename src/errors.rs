use thiserror::Error;

/// All errors that can occur in CryptoVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Key material errors ---
    #[error("Invalid or corrupted key file")]
    InvalidKeyMaterial,

    #[error("Key encoding failed: {0}")]
    EncodingError(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    // --- Cipher errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key file or corrupted data")]
    DecryptionFailed,

    #[error("Secret is too long: {len} bytes (maximum is {max} bytes)")]
    PayloadTooLarge { len: usize, max: usize },

    // --- Session errors ---
    #[error("Vault is locked — load your private key file first")]
    SessionLocked,

    // --- Remote store errors ---
    #[error("Credential store error: {0}")]
    RemoteStore(String),

    #[error("No public key registered for this account — run `cryptovault init` first")]
    PublicKeyMissing,

    #[error("Account already holds {0} credential(s) — a new key pair would make them unreadable (use --force to override)")]
    AlreadyInitialized(u64),

    #[error("Credential '{0}' not found")]
    CredentialNotFound(String),

    // --- Key file errors ---
    #[error("Key file error: {0}")]
    KeyFileError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- Audit errors ---
    #[error("Audit error: {0}")]
    AuditError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for CryptoVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
