//! Encryption for the file backend
//!
//! Thin wrappers over vetted crates:
//! - AES-256-GCM sealing of entry payloads
//! - Argon2id derivation of the file key from the keyring password
//! - Zeroize-on-drop holders for key material

mod cipher;
mod key_derivation;
mod secure_memory;

pub use cipher::{open, seal, SealedBox};
pub use key_derivation::{derive_key, generate_salt, KeyDerivationParams};
pub use secure_memory::{FileKey, Password};
