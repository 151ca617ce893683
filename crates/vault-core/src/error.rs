//! Error types for vault-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    /// Wrong key, or a token that was tampered with, truncated or malformed.
    /// Deliberately carries no detail.
    #[error("Invalid decryption key or data corrupted")]
    Authentication,

    #[error("Encryption failed")]
    Encryption,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key file not found: {}", .0.display())]
    KeyFileMissing(PathBuf),

    #[error("Key file already exists: {}", .0.display())]
    KeyFileExists(PathBuf),

    #[error("Credential file has an invalid format: {0}")]
    Format(String),

    #[error("No credentials found for application: {0}")]
    NotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<csv::Error> for VaultError {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(e) => VaultError::Io(e),
            _ => VaultError::Format(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_message_is_generic() {
        let message = VaultError::Authentication.to_string();
        assert_eq!(message, "Invalid decryption key or data corrupted");
    }

    #[test]
    fn test_csv_io_error_maps_to_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: VaultError = csv::Error::from(io).into();
        assert!(matches!(err, VaultError::Io(_)));
    }
}
