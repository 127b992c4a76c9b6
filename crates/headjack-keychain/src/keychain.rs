//! Secret store over the selected backend

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::{open_backend, BackendAdapter};
use crate::config::{Backend, StoreConfig};
use crate::error::{KeychainError, Result};
use crate::host::{Host, SystemHost};
use crate::selection::resolve_backend;
use crate::store::SecretStore;

/// Secret store bound to one backend for its whole lifetime
pub struct Keychain {
    backend: Box<dyn BackendAdapter>,
}

impl Keychain {
    /// Open the store described by `config` against the real environment
    pub fn open(config: StoreConfig) -> Result<Self> {
        Self::open_with_host(config, Arc::new(SystemHost))
    }

    /// Open the store, reading environment and terminal state through `host`.
    ///
    /// Backend selection happens once here. A backend that fails to open is
    /// an error; no other backend is tried.
    pub fn open_with_host(config: StoreConfig, host: Arc<dyn Host>) -> Result<Self> {
        let backend = resolve_backend(config.backend, host.as_ref())?;
        debug!("Using {} keyring backend", backend);

        let adapter = open_backend(backend, &config, host)?;
        Ok(Self { backend: adapter })
    }

    /// Wrap an adapter directly
    pub fn with_backend(backend: Box<dyn BackendAdapter>) -> Self {
        Self { backend }
    }

    /// Backend chosen at open time
    pub fn backend(&self) -> Backend {
        self.backend.kind()
    }
}

impl SecretStore for Keychain {
    fn set(&self, account: &str, secret: &str) -> Result<()> {
        if !self.backend.overwrites_in_place() {
            if let Err(e) = self.backend.remove(account) {
                if !e.is_missing() {
                    warn!("Ignoring failed removal of {} before overwrite: {}", account, e);
                }
            }
        }
        self.backend.set(account, secret.as_bytes())
    }

    fn get(&self, account: &str) -> Result<String> {
        let data = self.backend.get(account)?;
        String::from_utf8(data)
            .map_err(|e| KeychainError::Backend(format!("stored secret is not UTF-8: {}", e)))
    }

    fn delete(&self, account: &str) -> Result<()> {
        match self.backend.remove(account) {
            Err(e) if e.is_missing() => {
                debug!("Nothing stored for {}", account);
                Ok(())
            }
            other => other,
        }
    }
}

impl fmt::Debug for Keychain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keychain")
            .field("backend", &self.backend.kind())
            .finish()
    }
}
