//! Error types for headjack-keychain

use thiserror::Error;

/// Result type alias for secret store operations
pub type Result<T> = std::result::Result<T, KeychainError>;

/// Secret store error types
#[derive(Error, Debug)]
pub enum KeychainError {
    #[error("credential not found in keychain")]
    NotFound,

    #[error(
        "no password available for the encrypted file keyring: \
         set HEADJACK_KEYRING_PASSWORD or run interactively\n\n\
         To use a different backend instead, set HEADJACK_KEYRING_BACKEND \
         (keychain, wincred, secret-service, keyctl)"
    )]
    PasswordRequired,

    #[error("open keyring ({backend}): {reason}")]
    Open { backend: String, reason: String },

    #[error("keyring backend error: {0}")]
    Backend(String),

    #[error("invalid account name: {0:?}")]
    InvalidAccount(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KeychainError {
    /// Whether this error means "nothing stored under that account".
    ///
    /// A missing backing file counts as well, since the file backend keeps one
    /// file per account.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::NotFound => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<keyring::Error> for KeychainError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::NoEntry => Self::NotFound,
            other => Self::Backend(other.to_string()),
        }
    }
}
