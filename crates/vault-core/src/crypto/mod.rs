//! Cryptographic primitives for credential storage
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption into text-safe tokens
//! - Key generation, encoding and zeroize-on-drop handling

mod cipher;
mod key;

pub use cipher::{issued_at, Cipher};
pub use key::{VaultKey, KEY_LEN};
