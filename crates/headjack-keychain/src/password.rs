//! Password resolution for the encrypted file backend

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::{PasswordFn, ENV_KEYRING_PASSWORD};
use crate::error::{KeychainError, Result};
use crate::host::Host;

/// Finds the file backend password when the backend first needs it.
///
/// Sources, first match wins:
/// 1. the caller's [`PasswordFn`], used exclusively when present
/// 2. `HEADJACK_KEYRING_PASSWORD`, when non-empty
/// 3. a no-echo terminal prompt, only when stdin is a terminal
///
/// Otherwise [`KeychainError::PasswordRequired`].
#[derive(Clone)]
pub struct PasswordResolver {
    custom: Option<PasswordFn>,
    host: Arc<dyn Host>,
}

impl PasswordResolver {
    pub fn new(custom: Option<PasswordFn>, host: Arc<dyn Host>) -> Self {
        Self { custom, host }
    }

    pub fn resolve(&self, prompt: &str) -> Result<String> {
        if let Some(custom) = &self.custom {
            return custom(prompt);
        }

        if let Some(password) = self.host.var(ENV_KEYRING_PASSWORD).filter(|p| !p.is_empty()) {
            debug!("Using keyring password from {}", ENV_KEYRING_PASSWORD);
            return Ok(password);
        }

        if self.host.stdin_is_terminal() {
            return self.host.read_password(prompt);
        }

        Err(KeychainError::PasswordRequired)
    }
}

impl fmt::Debug for PasswordResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordResolver")
            .field("custom", &self.custom.is_some())
            .finish()
    }
}
