//! Command implementations
//!
//! Each command takes already-collected input and writes its report to
//! `out`, so prompting stays in the binary.

use anyhow::Result;
use std::io::Write;
use tracing::debug;

use vault_core::{
    create_key_file, retrieve_with_encoded_key, RecordStore, SettingsManager, Vault, VaultError,
    VaultPaths,
};

use crate::cli::ConfigAction;

/// Shown for both a wrong key and an unparseable one
pub const AUTH_FAILURE_MESSAGE: &str = "Invalid decryption key or data corrupted.";

/// Create the key file at the configured location
pub fn keygen(paths: &VaultPaths, show: bool, out: &mut impl Write) -> Result<()> {
    let key = create_key_file(&paths.key_file)?;

    writeln!(out, "Created key file at {}", paths.key_file.display())?;
    if show {
        writeln!(out, "{}", key.encode().as_str())?;
    }
    Ok(())
}

/// Encrypt and store a credential with the process key
pub fn save(
    paths: &VaultPaths,
    app: &str,
    username: &str,
    password: &str,
    out: &mut impl Write,
) -> Result<()> {
    let vault = Vault::open(paths)?;
    vault.save(app, username, password)?;

    writeln!(out, "Credentials for '{}' saved.", app)?;
    Ok(())
}

/// Print the distinct application names
pub fn list(paths: &VaultPaths, out: &mut impl Write) -> Result<()> {
    let store = RecordStore::new(&paths.data_file);
    if !store.exists() {
        writeln!(out, "No data available. Please add credentials first.")?;
        return Ok(());
    }

    for label in store.labels()? {
        writeln!(out, "{}", label)?;
    }
    Ok(())
}

/// Decrypt the first credential saved under `app` with a user-supplied key
pub fn get(paths: &VaultPaths, app: &str, encoded_key: &str, out: &mut impl Write) -> Result<()> {
    let store = RecordStore::new(&paths.data_file);
    let credential = retrieve_with_encoded_key(&store, app, encoded_key)?;
    debug!("Retrieved credentials for '{}'", app);

    writeln!(out, "Successfully decrypted!")?;
    writeln!(out, "Username: {}", credential.username())?;
    writeln!(out, "Password: {}", credential.password())?;
    Ok(())
}

/// Show or update the settings stored under `manager`'s storage directory
pub fn config(
    manager: &mut SettingsManager,
    action: ConfigAction,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        ConfigAction::Show => {}
        ConfigAction::SetDataFile { path } => {
            manager.get_mut().data_file = Some(path);
            manager.save()?;
        }
        ConfigAction::SetKeyFile { path } => {
            manager.get_mut().key_file = Some(path);
            manager.save()?;
        }
        ConfigAction::Reset => manager.reset()?,
    }

    let paths = manager.paths();
    writeln!(out, "Storage directory: {}", manager.storage_dir().display())?;
    writeln!(out, "Data file: {}", paths.data_file.display())?;
    writeln!(out, "Key file: {}", paths.key_file.display())?;
    Ok(())
}

/// User-facing message for a failed command. Never includes secrets.
pub fn describe_error(err: &anyhow::Error) -> String {
    let Some(vault_err) = err.downcast_ref::<VaultError>() else {
        return format!("Error: {:#}", err);
    };

    match vault_err {
        VaultError::Authentication | VaultError::InvalidKey(_) => AUTH_FAILURE_MESSAGE.to_string(),
        VaultError::TokenExpired => "Stored credential has expired.".to_string(),
        VaultError::Encryption => "Could not encrypt credentials.".to_string(),
        VaultError::NotFound(label) => format!("No credentials saved for '{}'.", label),
        VaultError::MissingField(field) => {
            format!("Please fill all fields before saving ({} is empty).", field)
        }
        VaultError::KeyFileMissing(path) => format!(
            "Key file '{}' not found. Please create one with `cred-vault keygen`.",
            path.display()
        ),
        VaultError::KeyFileExists(path) => {
            format!("Key file '{}' already exists; refusing to overwrite it.", path.display())
        }
        VaultError::Format(detail) => format!("Credential file is corrupted: {}", detail),
        VaultError::Io(e) => format!("Could not access credential storage: {}", e),
        VaultError::Settings(_) | VaultError::Serialization(_) => {
            format!("Configuration error: {}", vault_err)
        }
    }
}
