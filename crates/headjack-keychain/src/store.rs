//! Secret store trait

use crate::error::Result;

/// At-most-one-secret-per-account storage
pub trait SecretStore: Send + Sync {
    /// Store `secret` under `account`, replacing any previous value
    fn set(&self, account: &str, secret: &str) -> Result<()>;

    /// Fetch the secret for `account`.
    ///
    /// Returns [`KeychainError::NotFound`](crate::KeychainError::NotFound) if
    /// nothing is stored.
    fn get(&self, account: &str) -> Result<String>;

    /// Remove `account`. Removing an account that does not exist succeeds.
    fn delete(&self, account: &str) -> Result<()>;
}
