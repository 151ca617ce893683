//! # vault-core
//!
//! Core functionality for cred-vault including:
//! - AES-256-GCM authenticated encryption of credential fields
//! - Append-only CSV record store with a validated schema
//! - Key files and zeroize-on-drop key handling
//! - Settings for locating the data and key files

pub mod credential;
pub mod crypto;
pub mod error;
pub mod settings;
pub mod storage;
mod vault;

pub use credential::{CredentialRecord, DecryptedCredential};
pub use crypto::{Cipher, VaultKey};
pub use error::{Result, VaultError};
pub use settings::{Settings, SettingsManager, VaultPaths};
pub use storage::{create_key_file, load_key, RecordStore};
pub use vault::{decrypt_record, retrieve, retrieve_with_encoded_key, Vault};
