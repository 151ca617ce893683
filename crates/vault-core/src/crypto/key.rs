//! Symmetric key handling with automatic zeroization
//!
//! Keys are 32 random bytes. Their text form is URL-safe base64 with
//! padding (44 characters), which is what key files hold and what users
//! paste in at decryption time.

use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, VaultError};

/// Key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// Vault encryption key - automatically zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct VaultKey {
    key: [u8; KEY_LEN],
}

impl VaultKey {
    /// Create a key from raw bytes
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Generate a fresh random key from the OS RNG
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    /// Create from a slice (must be exactly 32 bytes)
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != KEY_LEN {
            return None;
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(slice);
        Some(Self { key })
    }

    /// Parse the text form. Surrounding whitespace is ignored.
    pub fn from_encoded(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            URL_SAFE
                .decode(encoded.trim())
                .map_err(|e| VaultError::InvalidKey(format!("not valid base64: {}", e)))?,
        );

        Self::from_slice(&bytes).ok_or_else(|| {
            VaultError::InvalidKey(format!(
                "expected {} bytes, got {}",
                KEY_LEN,
                bytes.len()
            ))
        })
    }

    /// Text form of the key. Treat the result as secret.
    pub fn encode(&self) -> Zeroizing<String> {
        Zeroizing::new(URL_SAFE.encode(self.key))
    }

    /// Get the key bytes (use carefully - avoid copying)
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl Clone for VaultKey {
    fn clone(&self) -> Self {
        Self { key: self.key }
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_slice() {
        let bytes = [42u8; 32];
        let key = VaultKey::from_slice(&bytes).unwrap();
        assert_eq!(key.as_bytes(), &bytes);
    }

    #[test]
    fn test_key_from_invalid_slice() {
        let bytes = [42u8; 16];
        assert!(VaultKey::from_slice(&bytes).is_none());
    }

    #[test]
    fn test_generated_keys_differ() {
        let key1 = VaultKey::generate();
        let key2 = VaultKey::generate();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_encoded_form() {
        let key = VaultKey::generate();
        let encoded = key.encode();
        assert_eq!(encoded.len(), 44);

        let parsed = VaultKey::from_encoded(&format!("  {}\n", encoded.as_str())).unwrap();
        assert_eq!(parsed.as_bytes(), key.as_bytes());
    }

    #[test]
    fn test_from_encoded_rejects_wrong_length() {
        let short = URL_SAFE.encode([7u8; 16]);
        let err = VaultKey::from_encoded(&short).unwrap_err();
        assert!(matches!(err, VaultError::InvalidKey(_)));
    }

    #[test]
    fn test_from_encoded_rejects_garbage() {
        assert!(matches!(
            VaultKey::from_encoded("not a key!"),
            Err(VaultError::InvalidKey(_))
        ));
        assert!(matches!(
            VaultKey::from_encoded(""),
            Err(VaultError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_debug_redacted() {
        let key = VaultKey::new([0u8; 32]);
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("0"));
    }
}
