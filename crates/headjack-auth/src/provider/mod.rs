//! Agent CLI credential providers
//!
//! Each provider bridges one external agent CLI to the secret store:
//! - `claude`: manual token entry (`claude setup-token`)
//! - `gemini`: harvests `oauth_creds.json` + `google_accounts.json`
//! - `codex`: harvests `auth.json`

mod claude;
mod codex;
mod gemini;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::BaseDirs;
use headjack_keychain::SecretStore;

pub use claude::{extract_token, ClaudeProvider};
pub use codex::CodexProvider;
pub use gemini::GeminiProvider;

use crate::credential::{load_credential, store_credential, Credential};
use crate::error::{AuthError, AuthResult};

/// Static description of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Short name, also the CLI argument
    pub name: &'static str,
    /// Vendor spelling for messages
    pub display_name: &'static str,
    /// Variable a subscription credential is injected into agent processes as
    pub subscription_env_var: &'static str,
    /// Variable an API key is injected as
    pub api_key_env_var: &'static str,
    /// Account the credential is stored under
    pub keychain_account: &'static str,
    /// Whether the agent container needs the credential written out at startup
    pub requires_container_setup: bool,
}

/// Capabilities every provider offers
pub trait Provider: Send + Sync {
    fn info(&self) -> &'static ProviderInfo;

    /// Find subscription credentials the agent CLI already produced.
    ///
    /// Returns the serialized credential, ready for
    /// [`validate_subscription`](Provider::validate_subscription).
    fn check_subscription(&self) -> AuthResult<String>;

    fn validate_subscription(&self, value: &str) -> AuthResult<()>;

    fn validate_api_key(&self, value: &str) -> AuthResult<()>;

    /// Clean up manually pasted subscription text before validation
    fn normalize_subscription(&self, raw: &str) -> String {
        raw.trim().to_string()
    }

    fn store(&self, store: &dyn SecretStore, credential: &Credential) -> AuthResult<()> {
        store_credential(store, self.info().keychain_account, credential)
    }

    fn load(&self, store: &dyn SecretStore) -> AuthResult<Credential> {
        load_credential(store, self.info().keychain_account)
    }
}

/// The closed set of supported providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Claude,
    Gemini,
    Codex,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Claude,
        ProviderKind::Gemini,
        ProviderKind::Codex,
    ];

    pub fn info(&self) -> &'static ProviderInfo {
        match self {
            ProviderKind::Claude => &claude::CLAUDE_INFO,
            ProviderKind::Gemini => &gemini::GEMINI_INFO,
            ProviderKind::Codex => &codex::CODEX_INFO,
        }
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Provider reading from the default locations under the home directory
    pub fn provider(&self) -> Box<dyn Provider> {
        match self {
            ProviderKind::Claude => Box::new(ClaudeProvider::new()),
            ProviderKind::Gemini => Box::new(GeminiProvider::new()),
            ProviderKind::Codex => Box::new(CodexProvider::new()),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                AuthError::InvalidArgument(format!(
                    "unknown provider {:?} (expected claude, gemini or codex)",
                    s
                ))
            })
    }
}

/// `~/<name>`, where agent CLIs keep their state; `None` without a home directory
pub(crate) fn home_config_dir(name: &str) -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(name))
}

/// Resolved config directory, or the error for a missing home directory
pub(crate) fn require_config_dir<'a>(
    dir: &'a Option<PathBuf>,
    name: &'static str,
) -> AuthResult<&'a Path> {
    dir.as_deref().ok_or(AuthError::NoHomeDirectory(name))
}

/// Read an artifact file; `None` if it does not exist
pub(crate) fn read_artifact(path: &Path) -> AuthResult<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(AuthError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Trimmed `value`, rejecting blanks and anything not starting with `prefix`.
///
/// The check is a literal, case-sensitive prefix match.
pub(crate) fn require_prefix<'a>(
    value: &'a str,
    what: &'static str,
    prefix: &str,
    invalid: &str,
) -> AuthResult<&'a str> {
    let value = require_non_empty(value, what)?;
    if !value.starts_with(prefix) {
        return Err(AuthError::InvalidFormat(format!("{}: must start with '{}'", invalid, prefix)));
    }
    Ok(value)
}

/// Trimmed `value`, rejecting blanks
pub(crate) fn require_non_empty<'a>(value: &'a str, what: &'static str) -> AuthResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AuthError::EmptyCredential(what));
    }
    Ok(value)
}
