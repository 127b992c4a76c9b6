//! # headjack-keychain
//!
//! Secret storage for headjack credentials:
//! - Platform keychains through the `keyring` crate (macOS Keychain, Secret
//!   Service, kernel keyring, Windows Credential Manager)
//! - AES-256-GCM encrypted files as the fallback backend
//! - One-time backend selection with a `HEADJACK_KEYRING_BACKEND` override
//! - Password resolution for the file backend that works headless and
//!   interactively

pub mod backend;
pub mod config;
pub mod crypto;
pub mod error;
pub mod host;
mod keychain;
mod password;
mod selection;
mod store;

pub use backend::{BackendAdapter, FileBackend, PlatformBackend};
pub use config::{
    Backend, PasswordFn, StoreConfig, ENV_KEYRING_BACKEND, ENV_KEYRING_PASSWORD, SERVICE_NAME,
};
pub use crypto::KeyDerivationParams;
pub use error::{KeychainError, Result};
pub use host::{Host, SystemHost};
pub use keychain::Keychain;
pub use password::PasswordResolver;
pub use selection::{detect_backend, resolve_backend};
pub use store::SecretStore;
