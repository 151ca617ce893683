//! AES-256-GCM authenticated encryption
//!
//! Token format (URL-safe base64 of):
//! - Version: 1 byte (`0x01`)
//! - Issued-at: 8 bytes, unix seconds, big-endian
//! - Nonce: 12 bytes (96 bits) - standard for GCM
//! - Ciphertext: variable length
//! - Auth tag: 16 bytes (128 bits)
//!
//! The version and timestamp are bound as associated data, so every byte
//! of the token is covered by the tag.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

use super::VaultKey;
use crate::error::{Result, VaultError};

const TOKEN_VERSION: u8 = 0x01;
const HEADER_LEN: usize = 1 + 8;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const MIN_TOKEN_LEN: usize = HEADER_LEN + NONCE_LEN + TAG_LEN;

/// Authenticated cipher bound to a single key
#[derive(Clone)]
pub struct Cipher {
    key: VaultKey,
}

impl Cipher {
    /// Create a cipher that encrypts and decrypts under `key`
    pub fn new(key: VaultKey) -> Self {
        Self { key }
    }

    /// Encrypt `plaintext` into a self-contained text token.
    ///
    /// Every call draws a fresh random nonce, so encrypting the same
    /// plaintext twice gives different tokens.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        self.encrypt_at(plaintext, Utc::now())
    }

    /// Encrypt a string and return the token
    pub fn encrypt_str(&self, plaintext: &str) -> Result<String> {
        self.encrypt(plaintext.as_bytes())
    }

    fn encrypt_at(&self, plaintext: &[u8], issued_at: DateTime<Utc>) -> Result<String> {
        let cipher = Aes256Gcm::new_from_slice(self.key.as_bytes())
            .map_err(|_| VaultError::InvalidKey("key must be 32 bytes".to_string()))?;

        let mut header = [0u8; HEADER_LEN];
        header[0] = TOKEN_VERSION;
        let secs = u64::try_from(issued_at.timestamp()).unwrap_or(0);
        header[1..].copy_from_slice(&secs.to_be_bytes());

        let mut iv = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut iv);

        // aes-gcm appends the auth tag to the ciphertext
        let ciphertext_with_tag = cipher
            .encrypt(
                Nonce::from_slice(&iv),
                Payload {
                    msg: plaintext,
                    aad: &header,
                },
            )
            .map_err(|_| VaultError::Encryption)?;

        let mut token = Vec::with_capacity(HEADER_LEN + NONCE_LEN + ciphertext_with_tag.len());
        token.extend_from_slice(&header);
        token.extend_from_slice(&iv);
        token.extend_from_slice(&ciphertext_with_tag);

        Ok(URL_SAFE.encode(token))
    }

    /// Decrypt a token produced by [`Cipher::encrypt`].
    ///
    /// Fails with [`VaultError::Authentication`] for a wrong key and for any
    /// altered, truncated or malformed token. Never returns partial output.
    pub fn decrypt(&self, token: &str) -> Result<Vec<u8>> {
        let raw = decode_token(token)?;
        let (header, rest) = raw.split_at(HEADER_LEN);
        let (iv, ciphertext_with_tag) = rest.split_at(NONCE_LEN);

        let cipher = Aes256Gcm::new_from_slice(self.key.as_bytes())
            .map_err(|_| VaultError::Authentication)?;

        cipher
            .decrypt(
                Nonce::from_slice(iv),
                Payload {
                    msg: ciphertext_with_tag,
                    aad: header,
                },
            )
            .map_err(|_| VaultError::Authentication)
    }

    /// Decrypt and interpret the plaintext as UTF-8
    pub fn decrypt_to_string(&self, token: &str) -> Result<String> {
        let plaintext = self.decrypt(token)?;
        String::from_utf8(plaintext).map_err(|e| {
            e.into_bytes().zeroize();
            VaultError::Authentication
        })
    }

    /// Decrypt, then reject tokens issued more than `ttl` ago.
    ///
    /// Authentication is checked first, so a stale token under the wrong
    /// key still reports [`VaultError::Authentication`].
    pub fn decrypt_with_ttl(&self, token: &str, ttl: Duration) -> Result<Vec<u8>> {
        let mut plaintext = self.decrypt(token)?;
        let issued = issued_at(token)?;

        if Utc::now() - issued > ttl {
            plaintext.zeroize();
            return Err(VaultError::TokenExpired);
        }

        Ok(plaintext)
    }
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher").field("key", &self.key).finish()
    }
}

/// Read the issued-at timestamp embedded in a token.
///
/// The timestamp is only trustworthy once the token has been decrypted
/// successfully.
pub fn issued_at(token: &str) -> Result<DateTime<Utc>> {
    let raw = decode_token(token)?;
    let mut secs = [0u8; 8];
    secs.copy_from_slice(&raw[1..HEADER_LEN]);
    let secs = i64::try_from(u64::from_be_bytes(secs)).map_err(|_| VaultError::Authentication)?;

    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or(VaultError::Authentication)
}

fn decode_token(token: &str) -> Result<Vec<u8>> {
    let raw = URL_SAFE
        .decode(token)
        .map_err(|_| VaultError::Authentication)?;

    if raw.len() < MIN_TOKEN_LEN || raw[0] != TOKEN_VERSION {
        return Err(VaultError::Authentication);
    }

    Ok(raw)
}
