//! hjk - credential commands for headjack
//!
//! Stores the credentials agent containers are started with:
//!
//! ```text
//! hjk auth claude               # paste a `claude setup-token` token or an API key
//! hjk auth gemini --subscription
//! hjk auth codex --api-key
//! hjk auth status
//! hjk auth logout codex
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use headjack_auth::{authenticate, logout, status, AuthMode, ProviderKind, TerminalPrompter};
use headjack_keychain::{Backend, Keychain, StoreConfig};

/// Headjack - run AI coding agents in isolated containers
#[derive(Parser, Debug)]
#[command(name = "hjk")]
#[command(version)]
#[command(about = "Headjack - credential management for AI coding agents")]
struct Cli {
    /// Secret storage backend (auto, keychain, secret-service, keyctl, wincred, file).
    /// HEADJACK_KEYRING_BACKEND takes precedence when set.
    #[arg(long, global = true, default_value = "auto")]
    keyring_backend: Backend,

    /// Directory for the encrypted file backend
    #[arg(long, global = true)]
    keyring_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage agent credentials
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Authenticate Claude Code
    Claude(ModeArgs),
    /// Authenticate Gemini CLI
    Gemini(ModeArgs),
    /// Authenticate Codex CLI
    Codex(ModeArgs),
    /// Show which providers have stored credentials
    Status,
    /// Remove a provider's stored credential
    Logout {
        /// claude, gemini or codex
        provider: ProviderKind,
    },
}

#[derive(Args, Debug)]
struct ModeArgs {
    /// Store a pay-per-use API key
    #[arg(long, conflicts_with = "subscription")]
    api_key: bool,

    /// Store subscription credentials
    #[arg(long)]
    subscription: bool,
}

impl ModeArgs {
    /// `None` leaves the choice to the user
    fn mode(&self) -> Option<AuthMode> {
        match (self.api_key, self.subscription) {
            (true, _) => Some(AuthMode::ApiKey),
            (_, true) => Some(AuthMode::Subscription),
            _ => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = StoreConfig::new().with_backend(cli.keyring_backend);
    if let Some(dir) = cli.keyring_dir {
        config = config.with_file_dir(dir);
    }
    debug!("Store configuration: {:?}", config);

    let Command::Auth { command } = cli.command;
    let store = Keychain::open(config).context("Failed to open secret store")?;

    match command {
        AuthCommand::Claude(args) => login(ProviderKind::Claude, &store, args.mode()),
        AuthCommand::Gemini(args) => login(ProviderKind::Gemini, &store, args.mode()),
        AuthCommand::Codex(args) => login(ProviderKind::Codex, &store, args.mode()),
        AuthCommand::Status => {
            for entry in status(&store)? {
                match entry.credential {
                    Some(kind) => println!("{:<8} {}", entry.provider, kind),
                    None => println!("{:<8} not configured", entry.provider),
                }
            }
            Ok(())
        }
        AuthCommand::Logout { provider } => {
            logout(provider, &store)?;
            println!("Removed {} credentials", provider);
            Ok(())
        }
    }
}

fn login(kind: ProviderKind, store: &Keychain, mode: Option<AuthMode>) -> Result<()> {
    let provider = kind.provider();
    let stored = authenticate(provider.as_ref(), store, &TerminalPrompter::new(), mode)?;
    println!(
        "Stored {} {} credentials in the {} keyring",
        kind,
        stored,
        store.backend()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_auth_provider_with_mode() {
        let cli = Cli::try_parse_from(["hjk", "auth", "codex", "--api-key"]).unwrap();
        let Command::Auth { command } = cli.command;
        match command {
            AuthCommand::Codex(args) => assert_eq!(args.mode(), Some(AuthMode::ApiKey)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_modes_conflict() {
        let both = ["hjk", "auth", "claude", "--api-key", "--subscription"];
        assert!(Cli::try_parse_from(both).is_err());
    }

    #[test]
    fn test_global_store_flags() {
        let args = [
            "hjk",
            "auth",
            "status",
            "--keyring-backend",
            "file",
            "--keyring-dir",
            "/tmp/hj",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.keyring_backend, Backend::File);
        assert_eq!(cli.keyring_dir, Some(PathBuf::from("/tmp/hj")));

        let unknown = ["hjk", "auth", "status", "--keyring-backend", "kwallet"];
        assert!(Cli::try_parse_from(unknown).is_err());
    }

    #[test]
    fn test_logout_requires_known_provider() {
        let cli = Cli::try_parse_from(["hjk", "auth", "logout", "gemini"]).unwrap();
        let Command::Auth { command } = cli.command;
        assert!(matches!(command, AuthCommand::Logout { provider: ProviderKind::Gemini }));

        assert!(Cli::try_parse_from(["hjk", "auth", "logout", "copilot"]).is_err());
    }
}
