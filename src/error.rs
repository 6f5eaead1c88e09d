//! Error types for gpgpass.

use thiserror::Error;

/// Main error type for vault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Vault not initialized, run 'gpgpass init <gpg-id>...' first")]
    NotInitialized,

    #[error("Vault already initialized at {0}, use --force to overwrite the recipient list")]
    AlreadyInitialized(String),

    #[error("GPG id file does not exist or is empty, run 'gpgpass init <gpg-id>...'")]
    GpgIdNotFound,

    #[error("No recipient ids given")]
    NoRecipients,

    #[error("Entry '{0}' not found")]
    EntryNotFound(String),

    #[error("Entry '{0}' already exists")]
    EntryAlreadyExists(String),

    #[error("Invalid entry name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Passwords don't match")]
    PasswordsDontMatch,

    #[error("Decryption failed: {0}")]
    DecryptionError(String),

    #[error("Encryption failed: {0}")]
    EncryptionError(String),

    #[error("GPG not available: {0}")]
    GpgUnavailable(String),

    #[error("Editor failed: {0}")]
    EditorFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("{0}")]
    Other(String),
}

impl VaultError {
    pub(crate) fn invalid_name(name: &str, reason: &'static str) -> Self {
        VaultError::InvalidName {
            name: name.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;
