//! Cryptographic utility functions
//!
//! `encrypt`/`decrypt` use AES-GCM with a random 12-byte nonce. The output is
//! standard base64 of `nonce || ciphertext || tag`. The key length picks the
//! variant: 16, 24 or 32 bytes for AES-128, AES-192 or AES-256.

use aes_gcm::aead::Aead;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, KeyInit};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// GCM nonce length in bytes
pub const NONCE_LEN: usize = 12;

type Aes192Gcm = AesGcm<Aes192, U12>;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("invalid key size {0}: must be 16, 24 or 32 bytes")]
    InvalidKeyLength(usize),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("ciphertext too short")]
    CiphertextTooShort,

    #[error("encryption failed")]
    Encrypt,

    /// Wrong key or tampered ciphertext
    #[error("message authentication failed")]
    Decrypt,

    #[error("plaintext is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

enum Cipher {
    Aes128(Box<Aes128Gcm>),
    Aes192(Box<Aes192Gcm>),
    Aes256(Box<Aes256Gcm>),
}

impl Cipher {
    fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let invalid = |_| CryptoError::InvalidKeyLength(key.len());
        match key.len() {
            16 => Ok(Self::Aes128(Box::new(
                Aes128Gcm::new_from_slice(key).map_err(invalid)?,
            ))),
            24 => Ok(Self::Aes192(Box::new(
                Aes192Gcm::new_from_slice(key).map_err(invalid)?,
            ))),
            32 => Ok(Self::Aes256(Box::new(
                Aes256Gcm::new_from_slice(key).map_err(invalid)?,
            ))),
            n => Err(CryptoError::InvalidKeyLength(n)),
        }
    }

    fn seal(&self, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = GenericArray::<u8, U12>::from_slice(nonce);
        match self {
            Self::Aes128(c) => c.encrypt(nonce, plaintext),
            Self::Aes192(c) => c.encrypt(nonce, plaintext),
            Self::Aes256(c) => c.encrypt(nonce, plaintext),
        }
    }

    fn open(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = GenericArray::<u8, U12>::from_slice(nonce);
        match self {
            Self::Aes128(c) => c.decrypt(nonce, ciphertext),
            Self::Aes192(c) => c.decrypt(nonce, ciphertext),
            Self::Aes256(c) => c.decrypt(nonce, ciphertext),
        }
    }
}

/// Encrypt `plaintext` with `key`
pub fn encrypt(key: impl AsRef<[u8]>, plaintext: &str) -> Result<String, CryptoError> {
    let cipher = Cipher::new(key.as_ref())?;

    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);

    let sealed = cipher
        .seal(&nonce, plaintext.as_bytes())
        .map_err(|_| CryptoError::Encrypt)?;

    let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);
    Ok(STANDARD.encode(out))
}

/// Decrypt a value produced by [`encrypt`] with the same key
pub fn decrypt(key: impl AsRef<[u8]>, ciphertext: &str) -> Result<String, CryptoError> {
    let data = STANDARD.decode(ciphertext)?;
    let cipher = Cipher::new(key.as_ref())?;

    if data.len() < NONCE_LEN {
        return Err(CryptoError::CiphertextTooShort);
    }
    let (nonce, sealed) = data.split_at(NONCE_LEN);

    let plaintext = cipher
        .open(nonce, sealed)
        .map_err(|_| CryptoError::Decrypt)?;
    Ok(String::from_utf8(plaintext)?)
}

/// Generate a cryptographically secure random key
pub fn generate_key(len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut key);
    key
}

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_16: &str = "0123456789abcdef";
    const KEY_24: &str = "0123456789abcdef01234567";
    const KEY_32: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_encrypt_decrypt_all_key_sizes() {
        for key in [KEY_16, KEY_24, KEY_32] {
            let sealed = encrypt(key, "hello world").unwrap();
            assert_eq!(decrypt(key, &sealed).unwrap(), "hello world", "key len {}", key.len());
        }
    }

    #[test]
    fn test_encrypt_uses_fresh_nonce() {
        let a = encrypt(KEY_32, "same").unwrap();
        let b = encrypt(KEY_32, "same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ciphertext_layout() {
        let sealed = STANDARD.decode(encrypt(KEY_16, "abc").unwrap()).unwrap();
        // nonce + plaintext + 16-byte tag
        assert_eq!(sealed.len(), NONCE_LEN + 3 + 16);
    }

    #[test]
    fn test_invalid_key_length() {
        assert!(matches!(
            encrypt("short", "x"),
            Err(CryptoError::InvalidKeyLength(5))
        ));
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let sealed = encrypt(KEY_32, "secret").unwrap();
        let other = "ffffffffffffffffffffffffffffffff";
        assert!(matches!(decrypt(other, &sealed), Err(CryptoError::Decrypt)));
    }

    #[test]
    fn test_decrypt_too_short() {
        let short = STANDARD.encode([0u8; 4]);
        let err = decrypt(KEY_16, &short).unwrap_err();
        assert_eq!(err.to_string(), "ciphertext too short");
    }

    #[test]
    fn test_decrypt_bad_base64() {
        assert!(matches!(
            decrypt(KEY_16, "not base64!"),
            Err(CryptoError::Base64(_))
        ));
    }

    #[test]
    fn test_decrypt_tampered() {
        let mut sealed = STANDARD.decode(encrypt(KEY_16, "payload").unwrap()).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(matches!(
            decrypt(KEY_16, &STANDARD.encode(sealed)),
            Err(CryptoError::Decrypt)
        ));
    }

    #[test]
    fn test_generate_key_works_as_aes_key() {
        let key = generate_key(32);
        assert_eq!(key.len(), 32);
        let sealed = encrypt(&key, "x").unwrap();
        assert_eq!(decrypt(&key, &sealed).unwrap(), "x");
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("hello", "hello"));
        assert!(!constant_time_eq("hello", "world"));
        assert!(!constant_time_eq("hello", "hell"));
        assert!(constant_time_eq("", ""));
    }
}
