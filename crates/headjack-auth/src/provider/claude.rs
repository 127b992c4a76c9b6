//! Claude Code provider
//!
//! Claude keeps its OAuth state in the OS keychain where we cannot read it,
//! so subscription tokens are pasted from `claude setup-token`.

use super::{require_prefix, Provider, ProviderInfo};
use crate::ansi::strip_ansi;
use crate::error::{AuthError, AuthResult};

pub(crate) static CLAUDE_INFO: ProviderInfo = ProviderInfo {
    name: "claude",
    display_name: "Claude",
    subscription_env_var: "CLAUDE_CODE_OAUTH_TOKEN",
    api_key_env_var: "ANTHROPIC_API_KEY",
    keychain_account: "claude-credential",
    requires_container_setup: true,
};

/// Prefix of every Claude OAuth token (`sk-ant-oat01-...`)
const TOKEN_PREFIX: &str = "sk-ant-";

/// Prefix of Anthropic API keys
const API_KEY_PREFIX: &str = "sk-ant-api";

const SETUP_INSTRUCTIONS: &str = "\
To get your OAuth token:
  1. Run: claude setup-token
  2. Complete the browser login flow
  3. Copy the token (starts with sk-ant-)";

/// Claude Code CLI
#[derive(Debug, Default, Clone, Copy)]
pub struct ClaudeProvider;

impl ClaudeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Provider for ClaudeProvider {
    fn info(&self) -> &'static ProviderInfo {
        &CLAUDE_INFO
    }

    fn check_subscription(&self) -> AuthResult<String> {
        Err(AuthError::ManualEntryRequired {
            provider: CLAUDE_INFO.display_name,
            instructions: SETUP_INSTRUCTIONS,
        })
    }

    fn validate_subscription(&self, value: &str) -> AuthResult<()> {
        require_prefix(value, "token", TOKEN_PREFIX, "invalid Claude OAuth token")?;
        Ok(())
    }

    fn validate_api_key(&self, value: &str) -> AuthResult<()> {
        require_prefix(value, "API key", API_KEY_PREFIX, "invalid Anthropic API key")?;
        Ok(())
    }

    /// Pasted `setup-token` output often carries colors and surrounding text
    fn normalize_subscription(&self, raw: &str) -> String {
        match extract_token(raw) {
            token if token.is_empty() => raw.trim().to_string(),
            token => token,
        }
    }
}

/// First line of `output` that is a Claude token once stripped of ANSI codes
/// and surrounding whitespace.
///
/// Returns an empty string when no line qualifies; callers must treat that as
/// "no token", never as a token.
pub fn extract_token(output: &str) -> String {
    output
        .split(['\n', '\r'])
        .map(|line| strip_ansi(line).trim().to_string())
        .find(|line| line.starts_with(TOKEN_PREFIX))
        .unwrap_or_default()
}
