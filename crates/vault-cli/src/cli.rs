//! Command line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vault_core::{SettingsManager, VaultPaths};

/// cred-vault - encrypted credential storage in a local CSV file
#[derive(Parser, Debug)]
#[command(name = "cred-vault")]
#[command(version)]
#[command(about = "Save and retrieve encrypted application credentials")]
pub struct Cli {
    /// Storage directory (holds settings.json and the default file locations)
    #[arg(long, global = true, env = "CRED_VAULT_DIR")]
    pub dir: Option<PathBuf>,

    /// Credential CSV file (overrides settings)
    #[arg(long, global = true, env = "CRED_VAULT_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Key file used for saving (overrides settings)
    #[arg(long, global = true, env = "CRED_VAULT_KEY_FILE")]
    pub key_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a new key file
    Keygen {
        /// Also print the encoded key
        #[arg(long)]
        show: bool,
    },

    /// Encrypt and save a credential
    Save {
        /// Application name
        #[arg(long)]
        app: String,

        /// Username
        #[arg(long)]
        username: String,

        /// Read the password from the first line of stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// List saved application names
    List,

    /// Decrypt a saved credential
    Get {
        /// Application name
        #[arg(long)]
        app: String,

        /// Decryption key; prompted for when not given
        #[arg(long, env = "CRED_VAULT_DECRYPT_KEY", hide_env_values = true)]
        decrypt_key: Option<String>,
    },

    /// Show or change the file locations stored in settings.json
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the storage directory and resolved file locations
    Show,

    /// Store a credential file location (relative paths resolve against the storage dir)
    SetDataFile { path: PathBuf },

    /// Store a key file location (relative paths resolve against the storage dir)
    SetKeyFile { path: PathBuf },

    /// Delete settings.json and return to the default locations
    Reset,
}

impl Cli {
    /// Storage directory from `--dir`/env, or the platform default
    pub fn storage_dir(&self) -> vault_core::Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => SettingsManager::default_dir(),
        }
    }

    /// Resolve file locations: flags and env first, then settings, then defaults
    pub fn paths(&self) -> vault_core::Result<VaultPaths> {
        let mut paths = SettingsManager::new(&self.storage_dir()?).paths();
        if let Some(data_file) = &self.data_file {
            paths.data_file = data_file.clone();
        }
        if let Some(key_file) = &self.key_file {
            paths.key_file = key_file.clone();
        }

        Ok(paths)
    }
}
