//! Application settings management
//!
//! Stores non-sensitive configuration (file locations) in a plain JSON
//! file next to the vault data. Missing or unreadable settings fall back to
//! defaults.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, VaultError};

/// Default name of the credential CSV file
pub const DEFAULT_DATA_FILE: &str = "credentials.csv";
/// Default name of the key file
pub const DEFAULT_KEY_FILE: &str = "key.key";

const SETTINGS_FILE: &str = "settings.json";

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Credential file location; relative paths resolve against the storage dir
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Key file location; relative paths resolve against the storage dir
    #[serde(default)]
    pub key_file: Option<PathBuf>,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self {
            version: 1,
            data_file: None,
            key_file: None,
        }
    }
}

/// Resolved file locations used to open a vault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    pub data_file: PathBuf,
    pub key_file: PathBuf,
}

/// Settings manager
pub struct SettingsManager {
    storage_dir: PathBuf,
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Load settings from `storage_dir`, falling back to defaults
    pub fn new(storage_dir: &Path) -> Self {
        let settings_file = storage_dir.join(SETTINGS_FILE);
        let settings = match Self::load_from_file(&settings_file) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring settings file {:?}: {}", settings_file, e);
                Settings::new()
            }
        };

        Self {
            storage_dir: storage_dir.to_path_buf(),
            settings_file,
            settings,
        }
    }

    /// Get the default storage directory
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "cred-vault", "cred-vault")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| VaultError::Settings("Could not determine data directory".to_string()))
    }

    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        std::fs::create_dir_all(&self.storage_dir)?;

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        std::fs::write(&temp_path, &contents)?;
        std::fs::rename(&temp_path, &self.settings_file)?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Storage directory the settings were loaded from
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Resolve the data and key file locations
    pub fn paths(&self) -> VaultPaths {
        VaultPaths {
            data_file: self.resolve(self.settings.data_file.as_deref(), DEFAULT_DATA_FILE),
            key_file: self.resolve(self.settings.key_file.as_deref(), DEFAULT_KEY_FILE),
        }
    }

    fn resolve(&self, configured: Option<&Path>, default_name: &str) -> PathBuf {
        match configured {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.storage_dir.join(path),
            None => self.storage_dir.join(default_name),
        }
    }

    /// Reset settings to defaults and delete settings file
    pub fn reset(&mut self) -> Result<()> {
        self.settings = Settings::new();

        if self.settings_file.exists() {
            std::fs::remove_file(&self.settings_file)?;
        }

        Ok(())
    }
}
