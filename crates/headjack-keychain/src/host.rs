//! Access to the ambient process environment
//!
//! Backend detection and password resolution only look at the outside world
//! through [`Host`], so tests can describe a platform without touching the
//! real environment.

use std::io::{IsTerminal, Write};
use std::path::Path;

use crate::error::Result;

/// Probes and interactive I/O the secret store needs from its host
pub trait Host: Send + Sync {
    /// Operating system identifier, as in `std::env::consts::OS`
    fn os(&self) -> &str;

    /// Value of an environment variable; unset and non-UTF-8 both yield `None`
    fn var(&self, key: &str) -> Option<String>;

    /// Whether something exists at `path`
    fn path_exists(&self, path: &Path) -> bool;

    /// Whether standard input is an interactive terminal
    fn stdin_is_terminal(&self) -> bool;

    /// Show `prompt` on stderr and read a line without echo
    fn read_password(&self, prompt: &str) -> Result<String>;
}

/// The real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl Host for SystemHost {
    fn os(&self) -> &str {
        std::env::consts::OS
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn stdin_is_terminal(&self) -> bool {
        std::io::stdin().is_terminal()
    }

    fn read_password(&self, prompt: &str) -> Result<String> {
        prompt_then_read(&mut std::io::stderr(), prompt, rpassword::read_password)
    }
}

/// Show `prompt` on `out` and run `read`.
///
/// The terminal echoes the newline of a successful read itself; only a failed
/// read leaves the cursor on the prompt line.
fn prompt_then_read<W, F>(out: &mut W, prompt: &str, read: F) -> Result<String>
where
    W: Write,
    F: FnOnce() -> std::io::Result<String>,
{
    write!(out, "{prompt}")?;
    out.flush()?;
    match read() {
        Ok(password) => Ok(password),
        Err(e) => {
            writeln!(out)?;
            Err(e.into())
        }
    }
}
