//! Codex CLI provider
//!
//! `codex login` writes its ChatGPT OAuth session to `~/.codex/auth.json`.
//! The file is stored as-is and written back verbatim inside containers.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{
    home_config_dir, read_artifact, require_config_dir, require_non_empty, require_prefix, Provider,
    ProviderInfo,
};
use crate::error::{AuthError, AuthResult};

pub(crate) static CODEX_INFO: ProviderInfo = ProviderInfo {
    name: "codex",
    display_name: "Codex",
    subscription_env_var: "CODEX_AUTH_JSON",
    api_key_env_var: "OPENAI_API_KEY",
    keychain_account: "codex-credential",
    requires_container_setup: true,
};

const AUTH_FILE: &str = "auth.json";

const API_KEY_PREFIX: &str = "sk-";

const LOGIN_INSTRUCTIONS: &str = "\
To authenticate with your ChatGPT subscription:
  1. Run: codex login
  2. Complete the OAuth flow in your browser
  3. Run: hjk auth codex";

/// Codex CLI
#[derive(Debug, Clone)]
pub struct CodexProvider {
    /// `None` when no home directory could be found
    config_dir: Option<PathBuf>,
}

impl CodexProvider {
    /// Read from `~/.codex`
    pub fn new() -> Self {
        Self {
            config_dir: home_config_dir(".codex"),
        }
    }

    /// Read from another Codex config directory
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: Some(config_dir.into()),
        }
    }

    fn dir(&self) -> AuthResult<&Path> {
        require_config_dir(&self.config_dir, "~/.codex")
    }
}

impl Default for CodexProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for CodexProvider {
    fn info(&self) -> &'static ProviderInfo {
        &CODEX_INFO
    }

    fn check_subscription(&self) -> AuthResult<String> {
        let path = self.dir()?.join(AUTH_FILE);
        let data = read_artifact(&path)?.ok_or(AuthError::NotAuthenticated {
            provider: CODEX_INFO.display_name,
            remediation: LOGIN_INSTRUCTIONS,
        })?;

        if data.is_empty() {
            return Err(AuthError::CorruptCredential(
                "codex auth.json is empty: login may have failed".to_string(),
            ));
        }

        // Not parsed here: the format belongs to the Codex CLI
        let contents = String::from_utf8(data).map_err(|_| {
            AuthError::CorruptCredential("codex auth.json is not valid UTF-8".to_string())
        })?;

        debug!("Found Codex credentials at {:?}", path);
        Ok(contents)
    }

    fn validate_subscription(&self, value: &str) -> AuthResult<()> {
        let value = require_non_empty(value, "credentials")?;
        if !value.starts_with('{') {
            return Err(AuthError::InvalidFormat(
                "invalid auth.json: must be a JSON object".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_api_key(&self, value: &str) -> AuthResult<()> {
        require_prefix(value, "API key", API_KEY_PREFIX, "invalid OpenAI API key")?;
        Ok(())
    }
}
