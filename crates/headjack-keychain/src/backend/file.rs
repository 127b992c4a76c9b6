//! Encrypted file backend
//!
//! One JSON document per account inside the storage directory. Each document
//! carries its own Argon2id salt and an AES-256-GCM sealed payload.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use super::BackendAdapter;
use crate::config::Backend;
use crate::crypto::{
    derive_key, generate_salt, open, seal, KeyDerivationParams, Password, SealedBox,
};
use crate::error::{KeychainError, Result};
use crate::password::PasswordResolver;

const FORMAT_VERSION: u32 = 1;

/// On-disk form of one entry
#[derive(Debug, Serialize, Deserialize)]
struct EntryFile {
    version: u32,
    salt: String,
    data: String,
}

/// Password-encrypted file storage
pub struct FileBackend {
    dir: PathBuf,
    passwords: PasswordResolver,
    kdf: KeyDerivationParams,
    /// Password resolved by the first operation that needed one
    password: Mutex<Option<Password>>,
}

impl FileBackend {
    pub fn new(dir: PathBuf, passwords: PasswordResolver, kdf: KeyDerivationParams) -> Self {
        debug!("Encrypted file keyring at {:?}", dir);
        Self {
            dir,
            passwords,
            kdf,
            password: Mutex::new(None),
        }
    }

    fn entry_path(&self, account: &str) -> Result<PathBuf> {
        let valid = !account.is_empty()
            && account != "."
            && account != ".."
            && !account.contains(['/', '\\', '\0']);
        if !valid {
            return Err(KeychainError::InvalidAccount(account.to_string()));
        }
        Ok(self.dir.join(account))
    }

    fn password(&self) -> Result<Password> {
        let mut cached = self
            .password
            .lock()
            .map_err(|_| KeychainError::Backend("password cache poisoned".to_string()))?;

        if let Some(password) = cached.as_ref() {
            return Ok(password.clone());
        }

        let prompt = format!("Enter passphrase to unlock {:?}: ", self.dir);
        let password = Password::new(self.passwords.resolve(&prompt)?);
        *cached = Some(password.clone());
        Ok(password)
    }

    fn ensure_dir(&self) -> Result<()> {
        if self.dir.is_dir() {
            return Ok(());
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder.create(&self.dir)?;
        Ok(())
    }
}

/// Write `contents` to a fresh temp file in `dir` and rename it onto `path`.
///
/// The temp file is created exclusively, so it never clobbers another entry.
fn write_atomic(dir: &Path, path: &Path, contents: &[u8]) -> Result<()> {
    let mut temp = NamedTempFile::new_in(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o600))?;
    }
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl BackendAdapter for FileBackend {
    fn set(&self, account: &str, data: &[u8]) -> Result<()> {
        let path = self.entry_path(account)?;
        let password = self.password()?;

        let salt = generate_salt();
        let key = derive_key(password.expose(), &salt, self.kdf)?;
        let entry = EntryFile {
            version: FORMAT_VERSION,
            salt,
            data: seal(data, &key)?.to_string(),
        };

        self.ensure_dir()?;
        write_atomic(&self.dir, &path, &serde_json::to_vec_pretty(&entry)?)?;

        debug!("Stored {} in {:?}", account, path);
        Ok(())
    }

    fn get(&self, account: &str) -> Result<Vec<u8>> {
        let path = self.entry_path(account)?;
        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No entry for {} in {:?}", account, self.dir);
                return Err(KeychainError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };

        let entry: EntryFile = serde_json::from_slice(&contents)?;
        if entry.version != FORMAT_VERSION {
            return Err(KeychainError::Decryption(format!(
                "unsupported entry version {}",
                entry.version
            )));
        }

        let sealed: SealedBox = entry.data.parse()?;
        let password = self.password()?;
        let key = derive_key(password.expose(), &entry.salt, self.kdf)?;
        let data = open(&sealed, &key)?;

        debug!("Retrieved {} from {:?}", account, path);
        Ok(data)
    }

    fn remove(&self, account: &str) -> Result<()> {
        let path = self.entry_path(account)?;
        fs::remove_file(&path)?;
        debug!("Deleted {:?}", path);
        Ok(())
    }

    fn kind(&self) -> Backend {
        Backend::File
    }
}
