//! Stored credential model

use std::fmt;

use headjack_keychain::SecretStore;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroize;

use crate::error::{AuthError, AuthResult};
use crate::provider::ProviderInfo;

/// Which kind of secret a credential holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    /// OAuth-derived artifact for a subscription plan
    Subscription,
    /// Pay-per-use API key
    ApiKey,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::Subscription => f.write_str("subscription"),
            CredentialKind::ApiKey => f.write_str("API key"),
        }
    }
}

/// A validated secret for one provider.
///
/// Serialized as `{"type": "subscription" | "api_key", "value": "..."}`; the
/// value is wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Credential {
    Subscription(String),
    ApiKey(String),
}

impl Credential {
    pub fn kind(&self) -> CredentialKind {
        match self {
            Credential::Subscription(_) => CredentialKind::Subscription,
            Credential::ApiKey(_) => CredentialKind::ApiKey,
        }
    }

    /// The secret itself (use carefully)
    pub fn value(&self) -> &str {
        match self {
            Credential::Subscription(value) | Credential::ApiKey(value) => value,
        }
    }

    /// Variable agent processes expect this credential in
    pub fn env_var(&self, info: &ProviderInfo) -> &'static str {
        match self.kind() {
            CredentialKind::Subscription => info.subscription_env_var,
            CredentialKind::ApiKey => info.api_key_env_var,
        }
    }
}

impl Drop for Credential {
    fn drop(&mut self) {
        match self {
            Credential::Subscription(value) | Credential::ApiKey(value) => value.zeroize(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("kind", &self.kind())
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Serialize `credential` into `store` under `account`
pub fn store_credential(
    store: &dyn SecretStore,
    account: &str,
    credential: &Credential,
) -> AuthResult<()> {
    if credential.value().trim().is_empty() {
        return Err(AuthError::EmptyCredential("credential"));
    }

    let mut serialized = serde_json::to_string(credential)?;
    let result = store.set(account, &serialized);
    serialized.zeroize();
    result?;

    debug!("Stored {} credential under {}", credential.kind(), account);
    Ok(())
}

/// Load the credential stored under `account`.
///
/// The store's not-found error comes back unchanged, see
/// [`AuthError::is_not_found`].
pub fn load_credential(store: &dyn SecretStore, account: &str) -> AuthResult<Credential> {
    let mut serialized = store.get(account)?;
    let parsed = serde_json::from_str::<Credential>(&serialized);
    serialized.zeroize();

    parsed.map_err(|e| {
        AuthError::CorruptCredential(format!("stored {} credential is unreadable: {}", account, e))
    })
}
