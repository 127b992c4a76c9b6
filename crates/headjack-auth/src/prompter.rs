//! Interactive prompts for credential entry

use std::io::{self, BufRead};

use console::{style, Key, Term};
use zeroize::Zeroize;

use crate::error::{AuthError, AuthResult};

/// User interaction needed while authenticating
pub trait Prompter {
    /// Show a message to the user
    fn print(&self, message: &str);

    /// Read one line with masked echo, trimmed
    fn prompt_secret(&self, prompt: &str) -> AuthResult<String>;

    /// Let the user pick one of `options`; returns its index
    fn prompt_choice(&self, prompt: &str, options: &[&str]) -> AuthResult<usize>;
}

/// Prompter on the controlling terminal
#[derive(Debug, Clone)]
pub struct TerminalPrompter {
    out: Term,
    ui: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            out: Term::stdout(),
            ui: Term::stderr(),
        }
    }

    fn select(&self, prompt: &str, options: &[&str]) -> io::Result<Option<usize>> {
        let mut cursor = 0;
        self.ui.hide_cursor()?;

        let result = loop {
            self.render(prompt, options, cursor)?;
            let key = match self.ui.read_key() {
                Ok(key) => key,
                Err(e) => break Err(e),
            };
            self.ui.clear_last_lines(options.len() + 1)?;

            match apply_key(&key, cursor, options.len()) {
                Selection::Pending(next) => cursor = next,
                Selection::Chosen(index) => break Ok(Some(index)),
                Selection::Canceled => break Ok(None),
            }
        };

        self.ui.show_cursor()?;
        if let Ok(Some(index)) = result {
            self.ui
                .write_line(&format!("{} {}", style(prompt).bold(), style(options[index]).cyan()))?;
        }
        result
    }

    /// Read a line from the terminal, echoing `*` per character.
    ///
    /// `None` when the user backs out.
    fn read_masked(&self, prompt: &str) -> io::Result<Option<String>> {
        self.ui.write_str(prompt)?;
        let mut input = String::new();

        loop {
            let key = match self.ui.read_key() {
                Ok(key) => key,
                Err(e) => {
                    input.zeroize();
                    return Err(e);
                }
            };
            match apply_secret_key(&key, &mut input) {
                SecretInput::Typed => self.ui.write_str("*")?,
                SecretInput::Erased => self.ui.clear_chars(1)?,
                SecretInput::Unchanged => {}
                SecretInput::Done => {
                    self.ui.write_line("")?;
                    return Ok(Some(input));
                }
                SecretInput::Canceled => {
                    self.ui.write_line("")?;
                    input.zeroize();
                    return Ok(None);
                }
            }
        }
    }

    fn render(&self, prompt: &str, options: &[&str], cursor: usize) -> io::Result<()> {
        self.ui.write_line(&style(prompt).bold().to_string())?;
        for (i, option) in options.iter().enumerate() {
            if i == cursor {
                self.ui
                    .write_line(&format!("{} {}", style(">").cyan(), style(option).cyan()))?;
            } else {
                self.ui.write_line(&format!("  {}", option))?;
            }
        }
        Ok(())
    }

    /// Numbered list read from stdin, for when there is no terminal to drive
    fn select_numbered(&self, prompt: &str, options: &[&str]) -> AuthResult<usize> {
        self.ui.write_line(prompt).map_err(prompt_error)?;
        for (i, option) in options.iter().enumerate() {
            self.ui
                .write_line(&format!("  {}) {}", i + 1, option))
                .map_err(prompt_error)?;
        }
        self.ui.write_str("Choice: ").map_err(prompt_error)?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line).map_err(prompt_error)?;
        if read == 0 {
            return Err(AuthError::Canceled);
        }
        parse_choice(&line, options.len())
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn print(&self, message: &str) {
        // Nothing useful to do if stdout is gone
        let _ = self.out.write_line(message);
    }

    fn prompt_secret(&self, prompt: &str) -> AuthResult<String> {
        let mut value = if self.ui.is_term() {
            self.read_masked(prompt)
                .map_err(prompt_error)?
                .ok_or(AuthError::Canceled)?
        } else {
            rpassword::prompt_password(prompt).map_err(prompt_error)?
        };
        let trimmed = value.trim().to_string();
        value.zeroize();
        Ok(trimmed)
    }

    fn prompt_choice(&self, prompt: &str, options: &[&str]) -> AuthResult<usize> {
        if options.is_empty() {
            return Err(AuthError::InvalidArgument("no options to choose from".to_string()));
        }

        if !self.ui.is_term() {
            return self.select_numbered(prompt, options);
        }

        match self.select(prompt, options) {
            Ok(Some(index)) => Ok(index),
            Ok(None) => Err(AuthError::Canceled),
            Err(e) => Err(prompt_error(e)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Pending(usize),
    Chosen(usize),
    Canceled,
}

/// Where one keypress leaves a list of `len` options
fn apply_key(key: &Key, cursor: usize, len: usize) -> Selection {
    match key {
        Key::ArrowUp | Key::Char('k') => Selection::Pending(cursor.saturating_sub(1)),
        Key::ArrowDown | Key::Char('j') => {
            Selection::Pending((cursor + 1).min(len.saturating_sub(1)))
        }
        Key::Enter => Selection::Chosen(cursor),
        Key::Escape | Key::CtrlC | Key::Char('q') => Selection::Canceled,
        _ => Selection::Pending(cursor),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SecretInput {
    Typed,
    Erased,
    Unchanged,
    Done,
    Canceled,
}

/// Apply one keypress to the secret being typed
fn apply_secret_key(key: &Key, input: &mut String) -> SecretInput {
    match key {
        Key::Enter => SecretInput::Done,
        Key::Escape | Key::CtrlC => SecretInput::Canceled,
        Key::Backspace => match input.pop() {
            Some(_) => SecretInput::Erased,
            None => SecretInput::Unchanged,
        },
        Key::Char(c) if !c.is_control() => {
            input.push(*c);
            SecretInput::Typed
        }
        _ => SecretInput::Unchanged,
    }
}

/// One-based choice typed at the numbered fallback
fn parse_choice(line: &str, len: usize) -> AuthResult<usize> {
    match line.trim().parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(n - 1),
        _ => Err(AuthError::InvalidArgument(format!(
            "expected a number between 1 and {}, got {:?}",
            len,
            line.trim()
        ))),
    }
}

/// Ctrl-C and end of input are the user backing out
fn prompt_error(e: io::Error) -> AuthError {
    match e.kind() {
        io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof => AuthError::Canceled,
        _ => AuthError::Prompt(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_clamps() {
        assert_eq!(apply_key(&Key::ArrowUp, 0, 2), Selection::Pending(0));
        assert_eq!(apply_key(&Key::ArrowDown, 0, 2), Selection::Pending(1));
        assert_eq!(apply_key(&Key::ArrowDown, 1, 2), Selection::Pending(1));
        assert_eq!(apply_key(&Key::Char('j'), 0, 3), Selection::Pending(1));
        assert_eq!(apply_key(&Key::Char('k'), 2, 3), Selection::Pending(1));
    }

    #[test]
    fn test_enter_selects_current() {
        assert_eq!(apply_key(&Key::Enter, 1, 2), Selection::Chosen(1));
    }

    #[test]
    fn test_escape_and_ctrl_c_cancel() {
        assert_eq!(apply_key(&Key::Escape, 0, 2), Selection::Canceled);
        assert_eq!(apply_key(&Key::CtrlC, 1, 2), Selection::Canceled);
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(apply_key(&Key::Char('x'), 1, 2), Selection::Pending(1));
        assert_eq!(apply_key(&Key::Tab, 0, 2), Selection::Pending(0));
    }

    #[test]
    fn test_secret_keys_build_the_value() {
        let mut input = String::new();
        let keys = [
            Key::Char('s'),
            Key::Char('k'),
            Key::Char('x'),
            Key::Backspace,
            Key::Char('-'),
        ];
        for key in keys {
            apply_secret_key(&key, &mut input);
        }
        assert_eq!(input, "sk-");
        assert_eq!(apply_secret_key(&Key::Enter, &mut input), SecretInput::Done);
    }

    #[test]
    fn test_secret_typing_is_echoed_as_mask() {
        let mut input = String::new();
        assert_eq!(apply_secret_key(&Key::Char('a'), &mut input), SecretInput::Typed);
        assert_eq!(apply_secret_key(&Key::Backspace, &mut input), SecretInput::Erased);
        assert_eq!(apply_secret_key(&Key::Backspace, &mut input), SecretInput::Unchanged);
        assert_eq!(apply_secret_key(&Key::ArrowLeft, &mut input), SecretInput::Unchanged);
        assert_eq!(apply_secret_key(&Key::Char('\t'), &mut input), SecretInput::Unchanged);
        assert!(input.is_empty());
    }

    #[test]
    fn test_secret_entry_can_be_canceled() {
        let mut input = String::from("sk-partial");
        assert_eq!(apply_secret_key(&Key::Escape, &mut input), SecretInput::Canceled);
        assert_eq!(apply_secret_key(&Key::CtrlC, &mut input), SecretInput::Canceled);
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1\n", 2).unwrap(), 0);
        assert_eq!(parse_choice(" 2 ", 2).unwrap(), 1);

        for bad in ["0", "3", "", "two"] {
            assert!(
                matches!(parse_choice(bad, 2), Err(AuthError::InvalidArgument(_))),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_empty_options_rejected() {
        let prompter = TerminalPrompter::new();
        assert!(matches!(
            prompter.prompt_choice("Pick", &[]),
            Err(AuthError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_interrupt_is_canceled() {
        assert!(matches!(
            prompt_error(io::Error::from(io::ErrorKind::Interrupted)),
            AuthError::Canceled
        ));
        assert!(matches!(
            prompt_error(io::Error::from(io::ErrorKind::UnexpectedEof)),
            AuthError::Canceled
        ));
        assert!(matches!(
            prompt_error(io::Error::from(io::ErrorKind::PermissionDenied)),
            AuthError::Prompt(_)
        ));
    }
}
