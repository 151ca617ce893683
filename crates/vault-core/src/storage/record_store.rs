//! CSV record store
//!
//! Credential records live in a single CSV file with the fixed header
//! `app_name,encrypted_username,encrypted_password`. Every append reads the
//! whole file, adds one row and rewrites the file atomically through a temp
//! file, so a failed write leaves the previous contents in place.

use indexmap::IndexSet;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::credential::CredentialRecord;
use crate::error::{Result, VaultError};

/// Column names, in order
pub const HEADER: [&str; 3] = ["app_name", "encrypted_username", "encrypted_password"];

/// Append-only store of credential records backed by a CSV file
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Create a store backed by `path`. Nothing is touched on disk until the
    /// first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists yet
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Sibling of the data file with `.tmp` appended to the full name, so it
    /// never coincides with the data file itself.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Load every record in file order.
    ///
    /// A missing file means nothing has been saved yet and yields an empty
    /// list. A file whose header or rows do not match the schema is a
    /// [`VaultError::Format`]; no partial result is returned.
    pub fn load_all(&self) -> Result<Vec<CredentialRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No credential file at {:?}", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(file);

        let headers = reader.headers()?;
        if !headers.iter().eq(HEADER.iter().copied()) {
            return Err(VaultError::Format(format!(
                "expected header '{}', found '{}'",
                HEADER.join(","),
                headers.iter().collect::<Vec<_>>().join(",")
            )));
        }

        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<CredentialRecord>, _>>()?;

        debug!("Loaded {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Append a record, preserving the order of everything already stored
    pub fn append(&self, record: &CredentialRecord) -> Result<()> {
        let mut records = self.load_all()?;
        records.push(record.clone());
        self.write_all(&records)?;

        debug!(
            "Appended record for '{}' ({} records)",
            record.application_label,
            records.len()
        );
        Ok(())
    }

    /// First record whose label equals `label` exactly
    pub fn find_by_label(&self, label: &str) -> Result<CredentialRecord> {
        self.load_all()?
            .into_iter()
            .find(|r| r.application_label == label)
            .ok_or_else(|| VaultError::NotFound(label.to_string()))
    }

    /// Distinct labels in order of first appearance
    pub fn labels(&self) -> Result<Vec<String>> {
        let labels: IndexSet<String> = self
            .load_all()?
            .into_iter()
            .map(|r| r.application_label)
            .collect();

        Ok(labels.into_iter().collect())
    }

    /// Rewrite the whole file. The temp file is removed if anything fails.
    fn write_all(&self, records: &[CredentialRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        let result = write_csv(&temp_path, records)
            .and_then(|()| fs::rename(&temp_path, &self.path).map_err(VaultError::from));

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }

        result
    }
}

fn write_csv(path: &Path, records: &[CredentialRecord]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }

    let file = writer
        .into_inner()
        .map_err(|e| VaultError::Io(e.into_error()))?;
    file.sync_all()?;

    Ok(())
}
