//! Key material that wipes itself on drop

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// 256-bit key derived from the keyring password
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct FileKey {
    key: [u8; 32],
}

impl FileKey {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

impl fmt::Debug for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileKey").field("key", &"[REDACTED]").finish()
    }
}

/// Keyring password, kept only as long as the store that resolved it
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password {
    value: String,
}

impl Password {
    pub fn new(value: String) -> Self {
        Self { value }
    }

    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Password").field("value", &"[REDACTED]").finish()
    }
}
