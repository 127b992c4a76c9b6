//! Platform secret stores
//!
//! Uses the `keyring` crate's per-platform credential builders:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet) or the kernel keyring

use keyring::credential::{CredentialBuilder, CredentialBuilderApi};
use keyring::Entry;
use tracing::debug;

use super::BackendAdapter;
use crate::config::Backend;
use crate::error::{KeychainError, Result};

/// Adapter over one `keyring` platform store
pub struct PlatformBackend {
    kind: Backend,
    service: String,
    builder: Box<CredentialBuilder>,
}

impl PlatformBackend {
    /// Open `kind` under the `service` namespace.
    ///
    /// Fails when `kind` is not compiled in for this target.
    pub fn open(kind: Backend, service: &str) -> Result<Self> {
        let builder = credential_builder(kind)?;

        // Entries are built lazily per call; building one up front surfaces
        // configuration problems at open time instead.
        builder
            .build(None, service, "headjack-probe")
            .map_err(|e| KeychainError::Open {
                backend: kind.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Opened {} keyring for service {}", kind, service);
        Ok(Self {
            kind,
            service: service.to_string(),
            builder,
        })
    }

    fn entry(&self, account: &str) -> Result<Entry> {
        let credential = self.builder.build(None, &self.service, account)?;
        Ok(Entry::new_with_credential(credential))
    }
}

fn credential_builder(kind: Backend) -> Result<Box<CredentialBuilder>> {
    match kind {
        #[cfg(target_os = "macos")]
        Backend::Keychain => Ok(keyring::macos::default_credential_builder()),
        #[cfg(target_os = "windows")]
        Backend::WinCred => Ok(keyring::windows::default_credential_builder()),
        #[cfg(any(target_os = "linux", target_os = "freebsd", target_os = "openbsd"))]
        Backend::SecretService => Ok(keyring::secret_service::default_credential_builder()),
        #[cfg(target_os = "linux")]
        Backend::Keyctl => Ok(keyring::keyutils::default_credential_builder()),
        other => Err(KeychainError::Open {
            backend: other.to_string(),
            reason: format!("not available on {}", std::env::consts::OS),
        }),
    }
}

impl BackendAdapter for PlatformBackend {
    fn set(&self, account: &str, data: &[u8]) -> Result<()> {
        self.entry(account)?.set_secret(data)?;
        debug!("Stored {} in {}", account, self.kind);
        Ok(())
    }

    fn get(&self, account: &str) -> Result<Vec<u8>> {
        let data = self.entry(account)?.get_secret()?;
        debug!("Retrieved {} from {}", account, self.kind);
        Ok(data)
    }

    fn remove(&self, account: &str) -> Result<()> {
        self.entry(account)?.delete_credential()?;
        debug!("Deleted {} from {}", account, self.kind);
        Ok(())
    }

    fn overwrites_in_place(&self) -> bool {
        // Keychain items keep the ACL of whichever binary created them;
        // recreating the item avoids a second access prompt.
        self.kind != Backend::Keychain
    }

    fn kind(&self) -> Backend {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_is_not_a_platform_backend() {
        assert!(matches!(
            PlatformBackend::open(Backend::File, "com.headjack.test"),
            Err(KeychainError::Open { .. })
        ));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_keychain_unavailable_off_macos() {
        match PlatformBackend::open(Backend::Keychain, "com.headjack.test") {
            Err(KeychainError::Open { backend, .. }) => assert_eq!(backend, "keychain"),
            _ => panic!("keychain backend should not open off macOS"),
        }
    }
}
