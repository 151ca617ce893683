//! Credential type definitions

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One saved credential set as it sits on disk.
///
/// Both secret fields are opaque cipher tokens. Labels are not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Application name (e.g., "email", "github")
    #[serde(rename = "app_name")]
    pub application_label: String,

    /// Encrypted username token
    pub encrypted_username: String,

    /// Encrypted password token
    pub encrypted_password: String,
}

impl CredentialRecord {
    pub fn new(
        application_label: impl Into<String>,
        encrypted_username: impl Into<String>,
        encrypted_password: impl Into<String>,
    ) -> Self {
        Self {
            application_label: application_label.into(),
            encrypted_username: encrypted_username.into(),
            encrypted_password: encrypted_password.into(),
        }
    }
}

/// Decrypted credential - automatically zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DecryptedCredential {
    username: String,
    password: String,
}

impl DecryptedCredential {
    /// Create a new decrypted credential
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// Get the username (use carefully)
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Get the password (use carefully)
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for DecryptedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptedCredential")
            .field("username", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .finish()
    }
}
