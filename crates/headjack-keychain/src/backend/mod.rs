//! Storage backend adapters
//!
//! One adapter per mechanism, all behind [`BackendAdapter`]:
//! 1. Platform stores reached through the `keyring` crate (macOS Keychain,
//!    Secret Service, kernel keyring, Windows Credential Manager)
//! 2. Password-encrypted files (fallback for everything else)

mod file;
mod platform;

use std::path::PathBuf;
use std::sync::Arc;

use directories::BaseDirs;

pub use file::FileBackend;
pub use platform::PlatformBackend;

use crate::config::{Backend, StoreConfig, SERVICE_NAME};
use crate::error::{KeychainError, Result};
use crate::host::Host;
use crate::password::PasswordResolver;

/// Uniform contract over one storage mechanism
pub trait BackendAdapter: Send + Sync {
    /// Store `data` under `account`
    fn set(&self, account: &str, data: &[u8]) -> Result<()>;

    /// Fetch the data for `account`; [`KeychainError::NotFound`] when absent
    fn get(&self, account: &str) -> Result<Vec<u8>>;

    /// Remove `account`; reports missing entries as errors
    fn remove(&self, account: &str) -> Result<()>;

    /// Whether `set` replaces an existing entry in place.
    ///
    /// When false the store removes the old entry first.
    fn overwrites_in_place(&self) -> bool {
        true
    }

    /// Backend this adapter implements
    fn kind(&self) -> Backend;
}

/// Build the adapter for an already resolved `backend`
pub(crate) fn open_backend(
    backend: Backend,
    config: &StoreConfig,
    host: Arc<dyn Host>,
) -> Result<Box<dyn BackendAdapter>> {
    match backend {
        Backend::Auto => Err(KeychainError::Open {
            backend: backend.to_string(),
            reason: "backend must be resolved before opening".to_string(),
        }),
        Backend::File => {
            let dir = match &config.file_dir {
                Some(dir) => dir.clone(),
                None => default_file_dir()?,
            };
            let passwords = PasswordResolver::new(config.password_fn.clone(), host);
            Ok(Box::new(FileBackend::new(dir, passwords, config.kdf)))
        }
        platform => Ok(Box::new(PlatformBackend::open(platform, SERVICE_NAME)?)),
    }
}

/// `~/.config/headjack`
pub fn default_file_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("headjack"))
        .ok_or_else(|| KeychainError::Open {
            backend: Backend::File.to_string(),
            reason: "could not determine home directory".to_string(),
        })
}
