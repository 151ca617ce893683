//! Key file loading and bootstrap
//!
//! A key file holds exactly one key in its encoded text form. The vault
//! only ever reads it; `create_key_file` exists for first-time setup.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::VaultKey;
use crate::error::{Result, VaultError};

/// Load the key stored at `path`
pub fn load_key(path: &Path) -> Result<VaultKey> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => Zeroizing::new(contents),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(VaultError::KeyFileMissing(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let key = VaultKey::from_encoded(&contents)?;
    debug!("Loaded key from {:?}", path);
    Ok(key)
}

/// Generate a new key and write it to `path`.
///
/// Never overwrites an existing file. On Unix the file is created with
/// mode `0600`.
pub fn create_key_file(path: &Path) -> Result<VaultKey> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = match options.open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(VaultError::KeyFileExists(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let key = VaultKey::generate();
    let encoded = key.encode();
    file.write_all(encoded.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;

    debug!("Created key file at {:?}", path);
    Ok(key)
}
