//! Argon2id derivation of the file backend key

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use super::FileKey;
use crate::error::{KeychainError, Result};

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDerivationParams {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Iterations
    pub time_cost: u32,
    pub parallelism: u32,
}

impl KeyDerivationParams {
    /// Cheap parameters for tests; never use for real secrets.
    pub fn insecure_fast() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MiB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

/// Fresh random salt, base64 encoded
pub fn generate_salt() -> String {
    SaltString::generate(&mut OsRng).to_string()
}

/// Derive the 32-byte file key for `password` and `salt`
pub fn derive_key(password: &str, salt: &str, params: KeyDerivationParams) -> Result<FileKey> {
    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(32),
    )
    .map_err(|e| KeychainError::KeyDerivation(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let salt = SaltString::from_b64(salt)
        .map_err(|e| KeychainError::KeyDerivation(format!("invalid salt: {}", e)))?;

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| KeychainError::KeyDerivation(e.to_string()))?
        .hash
        .ok_or_else(|| KeychainError::KeyDerivation("no hash output".to_string()))?;

    let bytes = hash.as_bytes();
    if bytes.len() != 32 {
        return Err(KeychainError::KeyDerivation(format!(
            "unexpected hash length {}",
            bytes.len()
        )));
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(bytes);
    Ok(FileKey::new(key))
}
