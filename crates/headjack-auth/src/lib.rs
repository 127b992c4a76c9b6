//! # headjack-auth
//!
//! Credentials for the agent CLIs headjack runs:
//! - Providers for Claude Code, Gemini CLI and Codex CLI that harvest
//!   existing logins or take pasted tokens, and validate what they get
//! - A single stored credential shape shared by every provider
//! - The interactive "authenticate provider X" flow, plus status and logout

pub mod ansi;
pub mod credential;
pub mod error;
pub mod flow;
pub mod prompter;
pub mod provider;

pub use credential::{load_credential, store_credential, Credential, CredentialKind};
pub use error::{AuthError, AuthResult};
pub use flow::{authenticate, choose_mode, logout, status, AuthMode, ProviderStatus};
pub use prompter::{Prompter, TerminalPrompter};
pub use provider::{
    extract_token, ClaudeProvider, CodexProvider, GeminiProvider, Provider, ProviderInfo,
    ProviderKind,
};
