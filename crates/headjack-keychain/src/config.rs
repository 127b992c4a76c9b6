//! Secret store configuration
//!
//! A [`StoreConfig`] is built once per invocation and handed to
//! [`Keychain::open`](crate::Keychain::open). Nothing here is persisted.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::crypto::KeyDerivationParams;
use crate::error::Result;

/// Service namespace every headjack secret is stored under
pub const SERVICE_NAME: &str = "com.headjack.cli";

/// Forces a specific backend, beating any backend chosen in code
pub const ENV_KEYRING_BACKEND: &str = "HEADJACK_KEYRING_BACKEND";

/// Password for the encrypted file backend (CI / headless use)
pub const ENV_KEYRING_PASSWORD: &str = "HEADJACK_KEYRING_PASSWORD";

/// Callback returning the encrypted file backend password.
///
/// Receives the prompt text a terminal implementation would display.
pub type PasswordFn = Arc<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// Secure storage mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Backend {
    /// Pick the best backend for the current platform
    #[default]
    Auto,
    /// macOS Keychain
    Keychain,
    /// Freedesktop Secret Service over D-Bus (GNOME Keyring, KWallet)
    SecretService,
    /// Linux kernel keyring
    Keyctl,
    /// Windows Credential Manager
    WinCred,
    /// Password-encrypted files in a local directory
    File,
}

impl Backend {
    /// Stable identifier used by the environment override and CLI flags
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Auto => "auto",
            Backend::Keychain => "keychain",
            Backend::SecretService => "secret-service",
            Backend::Keyctl => "keyctl",
            Backend::WinCred => "wincred",
            Backend::File => "file",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Backend::Auto),
            "keychain" => Ok(Backend::Keychain),
            "secret-service" => Ok(Backend::SecretService),
            "keyctl" => Ok(Backend::Keyctl),
            "wincred" => Ok(Backend::WinCred),
            "file" => Ok(Backend::File),
            other => Err(format!("unknown keyring backend: {other}")),
        }
    }
}

/// Secret store configuration
#[derive(Clone, Default)]
pub struct StoreConfig {
    /// Requested backend; [`Backend::Auto`] detects one at open time
    pub backend: Backend,
    /// Directory for the encrypted file backend (default `~/.config/headjack`)
    pub file_dir: Option<PathBuf>,
    /// Overrides every other password source for the file backend
    pub password_fn: Option<PasswordFn>,
    /// Argon2id cost parameters for the file backend
    pub kdf: KeyDerivationParams,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_file_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.file_dir = Some(dir.into());
        self
    }

    pub fn with_password_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        self.password_fn = Some(Arc::new(f));
        self
    }

    pub fn with_kdf(mut self, kdf: KeyDerivationParams) -> Self {
        self.kdf = kdf;
        self
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("file_dir", &self.file_dir)
            .field("password_fn", &self.password_fn.as_ref().map(|_| "<fn>"))
            .field("kdf", &self.kdf)
            .finish()
    }
}
