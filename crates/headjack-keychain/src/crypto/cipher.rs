//! AES-256-GCM sealing
//!
//! Serialized form: `{nonce_hex}:{tag_hex}:{ciphertext_hex}`

use std::fmt;
use std::str::FromStr;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

use super::FileKey;
use crate::error::{KeychainError, Result};

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Authenticated ciphertext of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBox {
    nonce: [u8; NONCE_LEN],
    tag: [u8; TAG_LEN],
    ciphertext: Vec<u8>,
}

impl fmt::Display for SealedBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            hex::encode(self.nonce),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for SealedBox {
    type Err = KeychainError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(':');
        let (Some(nonce), Some(tag), Some(ciphertext), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(KeychainError::Decryption(
                "expected nonce:tag:ciphertext".to_string(),
            ));
        };

        Ok(Self {
            nonce: decode_fixed(nonce, "nonce")?,
            tag: decode_fixed(tag, "tag")?,
            ciphertext: hex::decode(ciphertext)
                .map_err(|e| KeychainError::Decryption(format!("invalid ciphertext hex: {}", e)))?,
        })
    }
}

fn decode_fixed<const N: usize>(part: &str, what: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(part)
        .map_err(|e| KeychainError::Decryption(format!("invalid {} hex: {}", what, e)))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        KeychainError::Decryption(format!(
            "invalid {} length: expected {}, got {}",
            what,
            N,
            bytes.len()
        ))
    })
}

/// Encrypt `plaintext` under a fresh random nonce
pub fn seal(plaintext: &[u8], key: &FileKey) -> Result<SealedBox> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| KeychainError::Encryption(e.to_string()))?;

    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);

    // aes-gcm appends the tag to the ciphertext
    let mut sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| KeychainError::Encryption(e.to_string()))?;
    let tag_start = sealed
        .len()
        .checked_sub(TAG_LEN)
        .ok_or_else(|| KeychainError::Encryption("ciphertext too short".to_string()))?;

    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&sealed[tag_start..]);
    sealed.truncate(tag_start);

    Ok(SealedBox {
        nonce,
        tag,
        ciphertext: sealed,
    })
}

/// Decrypt and authenticate a [`SealedBox`]
pub fn open(sealed: &SealedBox, key: &FileKey) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| KeychainError::Decryption(e.to_string()))?;

    let mut payload = Vec::with_capacity(sealed.ciphertext.len() + TAG_LEN);
    payload.extend_from_slice(&sealed.ciphertext);
    payload.extend_from_slice(&sealed.tag);

    cipher
        .decrypt(Nonce::from_slice(&sealed.nonce), payload.as_slice())
        .map_err(|_| KeychainError::Decryption("wrong password or corrupted entry".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> FileKey {
        FileKey::new([byte; 32])
    }

    #[test]
    fn test_seal_open() {
        let sealed = seal(b"sk-ant-api03-secret", &key(1)).unwrap();
        assert_eq!(open(&sealed, &key(1)).unwrap(), b"sk-ant-api03-secret");
    }

    #[test]
    fn test_serialized_form_parses_back() {
        let sealed = seal(b"payload", &key(1)).unwrap();
        let parsed: SealedBox = sealed.to_string().parse().unwrap();
        assert_eq!(parsed, sealed);
    }

    #[test]
    fn test_nonces_differ() {
        let a = seal(b"same", &key(1)).unwrap();
        let b = seal(b"same", &key(1)).unwrap();
        assert_ne!(a.nonce, b.nonce);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = seal(b"secret", &key(1)).unwrap();
        assert!(matches!(open(&sealed, &key(2)), Err(KeychainError::Decryption(_))));
    }

    #[test]
    fn test_tampering_detected() {
        let mut sealed = seal(b"secret", &key(1)).unwrap();
        sealed.ciphertext[0] ^= 0xFF;
        assert!(open(&sealed, &key(1)).is_err());

        let mut sealed = seal(b"secret", &key(1)).unwrap();
        sealed.tag[0] ^= 0xFF;
        assert!(open(&sealed, &key(1)).is_err());
    }

    #[test]
    fn test_malformed_input() {
        assert!("garbage".parse::<SealedBox>().is_err());
        assert!("aa:bb".parse::<SealedBox>().is_err());
        assert!("aa:bb:cc:dd".parse::<SealedBox>().is_err());
        assert!("zz:zz:zz".parse::<SealedBox>().is_err());
        // right shape, wrong nonce length
        assert!("aabb:00000000000000000000000000000000:00".parse::<SealedBox>().is_err());
    }
}
