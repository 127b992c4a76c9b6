//! Providers against a real file-backed store

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use headjack_auth::{
    authenticate, logout, status, AuthError, AuthMode, AuthResult, ClaudeProvider, CodexProvider,
    Credential, CredentialKind, GeminiProvider, Prompter, Provider, ProviderKind,
};
use headjack_keychain::{
    Host, KeyDerivationParams, Keychain, Result as StoreResult, SecretStore, StoreConfig,
    ENV_KEYRING_BACKEND, ENV_KEYRING_PASSWORD,
};
use tempfile::TempDir;

struct Headless(HashMap<&'static str, &'static str>);

impl Host for Headless {
    fn os(&self) -> &str {
        "linux"
    }

    fn var(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|v| v.to_string())
    }

    fn path_exists(&self, _path: &Path) -> bool {
        false
    }

    fn stdin_is_terminal(&self) -> bool {
        false
    }

    fn read_password(&self, _prompt: &str) -> StoreResult<String> {
        panic!("headless host must never prompt")
    }
}

fn file_store(dir: &TempDir) -> Keychain {
    let host = Arc::new(Headless(
        [(ENV_KEYRING_BACKEND, "file"), (ENV_KEYRING_PASSWORD, "correct horse")]
            .into_iter()
            .collect(),
    ));
    let config = StoreConfig::new()
        .with_file_dir(dir.path())
        .with_kdf(KeyDerivationParams::insecure_fast());
    Keychain::open_with_host(config, host).unwrap()
}

#[derive(Default)]
struct Script {
    secrets: RefCell<VecDeque<String>>,
}

impl Prompter for Script {
    fn print(&self, _message: &str) {}

    fn prompt_secret(&self, _prompt: &str) -> AuthResult<String> {
        self.secrets.borrow_mut().pop_front().ok_or(AuthError::Canceled)
    }

    fn prompt_choice(&self, _prompt: &str, _options: &[&str]) -> AuthResult<usize> {
        Err(AuthError::Canceled)
    }
}

#[test]
fn test_every_provider_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let store = file_store(&temp_dir);

    let credentials = [
        (ProviderKind::Claude, Credential::Subscription("sk-ant-oat01-abc".to_string())),
        (ProviderKind::Gemini, Credential::ApiKey("AIzaSyExample".to_string())),
        (ProviderKind::Codex, Credential::Subscription("{\"tokens\":{}}".to_string())),
    ];

    for (kind, credential) in &credentials {
        kind.provider().store(&store, credential).unwrap();
    }
    for (kind, credential) in &credentials {
        assert_eq!(&kind.provider().load(&store).unwrap(), credential);
    }
}

#[test]
fn test_load_before_store_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let store = file_store(&temp_dir);

    for kind in ProviderKind::ALL {
        let err = kind.provider().load(&store).unwrap_err();
        assert!(err.is_not_found(), "{}: {}", kind, err);
    }
}

#[test]
fn test_overwrite_keeps_last() {
    let temp_dir = TempDir::new().unwrap();
    let store = file_store(&temp_dir);
    let provider = ClaudeProvider::new();

    provider
        .store(&store, &Credential::Subscription("sk-ant-oat01-old".to_string()))
        .unwrap();
    provider
        .store(&store, &Credential::ApiKey("sk-ant-api03-new".to_string()))
        .unwrap();

    assert_eq!(
        provider.load(&store).unwrap(),
        Credential::ApiKey("sk-ant-api03-new".to_string())
    );
}

#[test]
fn test_harvested_gemini_login_survives_storage() {
    let gemini_dir = TempDir::new().unwrap();
    fs::write(
        gemini_dir.path().join("oauth_creds.json"),
        r#"{"refresh_token": "1//0g", "token_type": "Bearer"}"#,
    )
    .unwrap();
    fs::write(gemini_dir.path().join("google_accounts.json"), r#"{"active": "a@b.c"}"#).unwrap();

    let store_dir = TempDir::new().unwrap();
    let store = file_store(&store_dir);
    let provider = GeminiProvider::with_config_dir(gemini_dir.path());

    let kind =
        authenticate(&provider, &store, &Script::default(), Some(AuthMode::Subscription)).unwrap();
    assert_eq!(kind, CredentialKind::Subscription);

    let credential = provider.load(&store).unwrap();
    assert!(credential.value().contains(r#"{"refresh_token": "1//0g", "token_type": "Bearer"}"#));
    assert_eq!(credential.env_var(provider.info()), "GEMINI_OAUTH_CREDS");
}

#[test]
fn test_pasted_claude_token_then_logout() {
    let store_dir = TempDir::new().unwrap();
    let store = file_store(&store_dir);
    let prompter = Script::default();
    prompter
        .secrets
        .borrow_mut()
        .push_back("Your token:\n\x1b[32msk-ant-oat01-pasted\x1b[0m\n".to_string());

    authenticate(&ClaudeProvider::new(), &store, &prompter, Some(AuthMode::Subscription)).unwrap();
    assert_eq!(
        ClaudeProvider::new().load(&store).unwrap(),
        Credential::Subscription("sk-ant-oat01-pasted".to_string())
    );

    let report = status(&store).unwrap();
    assert_eq!(report[0].credential, Some(CredentialKind::Subscription));

    logout(ProviderKind::Claude, &store).unwrap();
    logout(ProviderKind::Claude, &store).unwrap();
    assert!(ClaudeProvider::new().load(&store).unwrap_err().is_not_found());
}

#[test]
fn test_codex_without_login_stores_nothing() {
    let codex_dir = TempDir::new().unwrap();
    let store_dir = TempDir::new().unwrap();
    let store = file_store(&store_dir);
    let provider = CodexProvider::with_config_dir(codex_dir.path());

    let prompter = Script::default();
    let err =
        authenticate(&provider, &store, &prompter, Some(AuthMode::Subscription)).unwrap_err();

    assert!(matches!(err, AuthError::NotAuthenticated { .. }));
    assert!(store.get("codex-credential").is_err());
}
