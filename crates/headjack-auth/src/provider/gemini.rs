//! Gemini CLI provider
//!
//! Gemini CLI caches its Google OAuth login in two files under `~/.gemini`.
//! Both are needed to restore the login inside an agent container, so they
//! are stored together as one JSON document:
//!
//! ```json
//! {"oauth_creds": { ... }, "google_accounts": { ... }}
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::debug;

use super::{
    home_config_dir, read_artifact, require_config_dir, require_non_empty, require_prefix, Provider,
    ProviderInfo,
};
use crate::error::{AuthError, AuthResult};

pub(crate) static GEMINI_INFO: ProviderInfo = ProviderInfo {
    name: "gemini",
    display_name: "Gemini",
    subscription_env_var: "GEMINI_OAUTH_CREDS",
    api_key_env_var: "GEMINI_API_KEY",
    keychain_account: "gemini-credential",
    requires_container_setup: true,
};

const OAUTH_CREDS_FILE: &str = "oauth_creds.json";
const GOOGLE_ACCOUNTS_FILE: &str = "google_accounts.json";

/// Google AI Studio keys
const API_KEY_PREFIX: &str = "AIza";

const LOGIN_INSTRUCTIONS: &str = "\
To authenticate with your Gemini subscription:
  1. Run: gemini
  2. Complete the Google OAuth login
  3. Run: hjk auth gemini";

/// Stored form of a Gemini subscription
#[derive(Debug, Serialize, Deserialize)]
struct GeminiBundle {
    #[serde(default)]
    oauth_creds: Option<Box<RawValue>>,
    #[serde(default)]
    google_accounts: Option<Box<RawValue>>,
}

#[derive(Debug, Deserialize)]
struct OAuthCreds {
    #[serde(default)]
    refresh_token: Option<String>,
}

impl OAuthCreds {
    fn has_refresh_token(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Gemini CLI
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    /// `None` when no home directory could be found
    config_dir: Option<PathBuf>,
}

impl GeminiProvider {
    /// Read from `~/.gemini`
    pub fn new() -> Self {
        Self {
            config_dir: home_config_dir(".gemini"),
        }
    }

    /// Read from another Gemini config directory
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: Some(config_dir.into()),
        }
    }

    fn dir(&self) -> AuthResult<&Path> {
        require_config_dir(&self.config_dir, "~/.gemini")
    }

    fn read_bundle(&self) -> AuthResult<GeminiBundle> {
        let dir = self.dir()?;
        let oauth_path = dir.join(OAUTH_CREDS_FILE);
        let oauth_data = read_artifact(&oauth_path)?.ok_or(AuthError::NotAuthenticated {
            provider: GEMINI_INFO.display_name,
            remediation: LOGIN_INSTRUCTIONS,
        })?;

        let creds: OAuthCreds = serde_json::from_slice(&oauth_data).map_err(|e| {
            AuthError::CorruptCredential(format!("parse {}: {}", OAUTH_CREDS_FILE, e))
        })?;
        if !creds.has_refresh_token() {
            return Err(AuthError::CorruptCredential(
                "gemini credentials missing refresh token: \
                 please run 'gemini' and complete the OAuth login"
                    .to_string(),
            ));
        }

        let accounts_path = dir.join(GOOGLE_ACCOUNTS_FILE);
        let accounts_data = read_artifact(&accounts_path)?.ok_or(AuthError::MissingArtifact {
            file: GOOGLE_ACCOUNTS_FILE,
            hint: "please run 'gemini' and complete the OAuth login first",
        })?;

        debug!("Found Gemini credentials in {:?}", dir);
        Ok(GeminiBundle {
            oauth_creds: Some(raw_document(oauth_data, OAUTH_CREDS_FILE)?),
            google_accounts: Some(raw_document(accounts_data, GOOGLE_ACCOUNTS_FILE)?),
        })
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep a JSON document exactly as the CLI wrote it
fn raw_document(data: Vec<u8>, file: &str) -> AuthResult<Box<RawValue>> {
    let text = String::from_utf8(data)
        .map_err(|_| AuthError::CorruptCredential(format!("{} is not valid UTF-8", file)))?;
    RawValue::from_string(text)
        .map_err(|e| AuthError::CorruptCredential(format!("{} is not valid JSON: {}", file, e)))
}

impl Provider for GeminiProvider {
    fn info(&self) -> &'static ProviderInfo {
        &GEMINI_INFO
    }

    fn check_subscription(&self) -> AuthResult<String> {
        let bundle = self.read_bundle()?;
        Ok(serde_json::to_string(&bundle)?)
    }

    fn validate_subscription(&self, value: &str) -> AuthResult<()> {
        let value = require_non_empty(value, "credentials")?;

        let bundle: GeminiBundle = serde_json::from_str(value)
            .map_err(|e| AuthError::InvalidFormat(format!("invalid JSON format: {}", e)))?;
        let oauth_creds = bundle.oauth_creds.ok_or_else(|| {
            AuthError::InvalidFormat("missing oauth_creds in credentials".to_string())
        })?;
        if bundle.google_accounts.is_none() {
            return Err(AuthError::InvalidFormat(
                "missing google_accounts in credentials".to_string(),
            ));
        }

        let creds: OAuthCreds = serde_json::from_str(oauth_creds.get())
            .map_err(|e| AuthError::InvalidFormat(format!("parse oauth_creds: {}", e)))?;
        if !creds.has_refresh_token() {
            return Err(AuthError::InvalidFormat(
                "missing refresh_token in oauth_creds".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_api_key(&self, value: &str) -> AuthResult<()> {
        require_prefix(value, "API key", API_KEY_PREFIX, "invalid Google AI API key")?;
        Ok(())
    }
}
