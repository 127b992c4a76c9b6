//! ANSI escape stripping for captured terminal output

/// Remove ANSI escape sequences from `s`.
///
/// `ESC` starts a sequence and the next ASCII letter ends it; both, and
/// everything between, are dropped. This covers the CSI color and cursor
/// codes agent CLIs emit, not the full terminal grammar. An unterminated
/// sequence swallows the rest of the input.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_escape = false;

    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else {
            out.push(c);
        }
    }

    out
}
