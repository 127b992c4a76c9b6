//! Authenticate, inspect and forget provider credentials

use headjack_keychain::SecretStore;
use tracing::{debug, info};

use crate::credential::{load_credential, Credential, CredentialKind};
use crate::error::{AuthError, AuthResult};
use crate::prompter::Prompter;
use crate::provider::{Provider, ProviderKind};

/// How the user pays for the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Subscription,
    ApiKey,
}

/// Ask the user which kind of credential to set up
pub fn choose_mode(prompter: &dyn Prompter) -> AuthResult<AuthMode> {
    let options = [
        "Subscription (use your existing plan)",
        "API key (pay per use)",
    ];
    match prompter.prompt_choice("How do you want to authenticate?", &options)? {
        0 => Ok(AuthMode::Subscription),
        _ => Ok(AuthMode::ApiKey),
    }
}

/// Obtain, validate and store a credential for `provider`.
///
/// Without a `mode` the user is asked. Subscriptions are harvested from the
/// agent CLI's own files when it has any; otherwise the user is shown where
/// to get a token and asked to paste it.
pub fn authenticate(
    provider: &dyn Provider,
    store: &dyn SecretStore,
    prompter: &dyn Prompter,
    mode: Option<AuthMode>,
) -> AuthResult<CredentialKind> {
    let info = provider.info();
    let mode = match mode {
        Some(mode) => mode,
        None => choose_mode(prompter)?,
    };

    let credential = match mode {
        AuthMode::Subscription => Credential::Subscription(subscription(provider, prompter)?),
        AuthMode::ApiKey => {
            let raw = prompter.prompt_secret(&format!("Enter your {} API key: ", info.name))?;
            provider.validate_api_key(&raw)?;
            Credential::ApiKey(raw.trim().to_string())
        }
    };

    provider.store(store, &credential)?;
    info!(
        "Stored {} {} credential (injected as {})",
        info.name,
        credential.kind(),
        credential.env_var(info)
    );
    Ok(credential.kind())
}

fn subscription(provider: &dyn Provider, prompter: &dyn Prompter) -> AuthResult<String> {
    let value = match provider.check_subscription() {
        Ok(value) => {
            debug!("Using existing {} login", provider.info().name);
            value
        }
        Err(err @ AuthError::ManualEntryRequired { .. }) => {
            prompter.print(&err.to_string());
            prompter.print("");
            let raw = prompter.prompt_secret("Paste your token: ")?;
            provider.normalize_subscription(&raw)
        }
        Err(err) => return Err(err),
    };

    provider.validate_subscription(&value)?;
    Ok(value)
}

/// What is stored for one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderStatus {
    pub provider: ProviderKind,
    /// `None` when nothing is stored
    pub credential: Option<CredentialKind>,
}

/// Stored credential kind for every provider
pub fn status(store: &dyn SecretStore) -> AuthResult<Vec<ProviderStatus>> {
    ProviderKind::ALL
        .into_iter()
        .map(|provider| {
            let credential = match load_credential(store, provider.info().keychain_account) {
                Ok(credential) => Some(credential.kind()),
                Err(e) if e.is_not_found() => None,
                Err(e) => return Err(e),
            };
            Ok(ProviderStatus { provider, credential })
        })
        .collect()
}

/// Forget the stored credential for `provider`; fine if there is none
pub fn logout(provider: ProviderKind, store: &dyn SecretStore) -> AuthResult<()> {
    store.delete(provider.info().keychain_account)?;
    info!("Removed {} credential", provider);
    Ok(())
}
