//! Error types for headjack-auth

use std::path::PathBuf;

use headjack_keychain::KeychainError;
use thiserror::Error;

/// Result type alias for provider operations
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Authentication error types
///
/// `NotAuthenticated` and `ManualEntryRequired` render fixed per-provider
/// instructions naming the exact commands to run.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{provider} credentials not found.\n\n{remediation}")]
    NotAuthenticated {
        provider: &'static str,
        remediation: &'static str,
    },

    #[error("{provider} subscription credentials must be entered manually.\n\n{instructions}")]
    ManualEntryRequired {
        provider: &'static str,
        instructions: &'static str,
    },

    #[error("{0}")]
    CorruptCredential(String),

    #[error("{file} not found: {hint}")]
    MissingArtifact {
        file: &'static str,
        hint: &'static str,
    },

    #[error("{0} cannot be empty")]
    EmptyCredential(&'static str),

    #[error("{0}")]
    InvalidFormat(String),

    #[error("home directory not found: cannot locate {0}")]
    NoHomeDirectory(&'static str),

    #[error("canceled by user")]
    Canceled,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Storage(#[from] KeychainError),

    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuthError {
    /// Nothing is stored for the provider yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, AuthError::Storage(KeychainError::NotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_passes_through() {
        let err: AuthError = KeychainError::NotFound.into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), KeychainError::NotFound.to_string());
    }

    #[test]
    fn test_other_storage_errors_are_not_not_found() {
        let err: AuthError = KeychainError::PasswordRequired.into();
        assert!(!err.is_not_found());
        assert!(!AuthError::Canceled.is_not_found());
    }

    #[test]
    fn test_empty_credential_message() {
        assert_eq!(AuthError::EmptyCredential("API key").to_string(), "API key cannot be empty");
    }
}
