//! Save and retrieve flows
//!
//! A [`Vault`] pairs the record store with the process cipher (bound to the
//! key from the key file). Retrieval never uses that cipher: it builds a
//! fresh one from whatever key the caller supplies.

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::credential::{CredentialRecord, DecryptedCredential};
use crate::crypto::{Cipher, VaultKey};
use crate::error::{Result, VaultError};
use crate::settings::VaultPaths;
use crate::storage::{load_key, RecordStore};

/// Record store plus the cipher used for new saves
#[derive(Debug)]
pub struct Vault {
    store: RecordStore,
    cipher: Cipher,
}

impl Vault {
    /// Open the vault described by `paths`.
    ///
    /// Fails with [`VaultError::KeyFileMissing`] when there is no key file;
    /// the vault never runs without a key.
    pub fn open(paths: &VaultPaths) -> Result<Self> {
        let key = load_key(&paths.key_file)?;
        Ok(Self::with_key(RecordStore::new(&paths.data_file), key))
    }

    /// Build a vault from an existing store and key
    pub fn with_key(store: RecordStore, key: VaultKey) -> Self {
        Self {
            store,
            cipher: Cipher::new(key),
        }
    }

    /// The underlying record store
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Encrypt `username` and `password` and append them under `label`
    pub fn save(&self, label: &str, username: &str, password: &str) -> Result<CredentialRecord> {
        if label.is_empty() {
            return Err(VaultError::MissingField("application name"));
        }
        if username.is_empty() {
            return Err(VaultError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(VaultError::MissingField("password"));
        }

        let record = CredentialRecord::new(
            label,
            self.cipher.encrypt_str(username)?,
            self.cipher.encrypt_str(password)?,
        );
        self.store.append(&record)?;

        info!("Stored credentials for '{}'", label);
        Ok(record)
    }

    /// All stored records, in file order
    pub fn records(&self) -> Result<Vec<CredentialRecord>> {
        self.store.load_all()
    }

    /// Distinct labels, in first-appearance order
    pub fn labels(&self) -> Result<Vec<String>> {
        self.store.labels()
    }

    /// Retrieve `label` from this vault's store with a caller-supplied key
    pub fn retrieve(&self, label: &str, key: &VaultKey) -> Result<DecryptedCredential> {
        retrieve(&self.store, label, key)
    }
}

/// Look up the first record for `label` and decrypt it with `key`.
///
/// Both fields must authenticate; if either fails the result is
/// [`VaultError::Authentication`] and no plaintext is returned.
pub fn retrieve(store: &RecordStore, label: &str, key: &VaultKey) -> Result<DecryptedCredential> {
    let record = store.find_by_label(label)?;
    decrypt_record(&record, key)
}

/// Like [`retrieve`], but with the key in its encoded text form.
///
/// An unparseable key is reported as [`VaultError::InvalidKey`]; the label
/// is looked up first so a missing record is still [`VaultError::NotFound`].
pub fn retrieve_with_encoded_key(
    store: &RecordStore,
    label: &str,
    encoded_key: &str,
) -> Result<DecryptedCredential> {
    let record = store.find_by_label(label)?;
    let key = VaultKey::from_encoded(encoded_key)?;
    decrypt_record(&record, &key)
}

/// Decrypt both fields of `record` with a fresh cipher bound to `key`
pub fn decrypt_record(record: &CredentialRecord, key: &VaultKey) -> Result<DecryptedCredential> {
    let cipher = Cipher::new(key.clone());

    let mut username = Zeroizing::new(cipher.decrypt_to_string(&record.encrypted_username)?);
    let mut password = Zeroizing::new(cipher.decrypt_to_string(&record.encrypted_password)?);

    debug!("Decrypted credentials for '{}'", record.application_label);
    Ok(DecryptedCredential::new(
        std::mem::take(&mut *username),
        std::mem::take(&mut *password),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::create_key_file;
    use tempfile::TempDir;

    fn test_vault() -> (Vault, VaultKey, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let key = VaultKey::generate();
        let store = RecordStore::new(temp_dir.path().join("credentials.csv"));
        (Vault::with_key(store, key.clone()), key, temp_dir)
    }

    #[test]
    fn test_save_and_retrieve_scenario() {
        let (vault, k1, _dir) = test_vault();

        vault.save("email", "alice", "s3cr3t").unwrap();

        let records = vault.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].application_label, "email");
        assert_ne!(records[0].encrypted_username, "alice");
        assert_ne!(records[0].encrypted_password, "s3cr3t");

        let credential = vault.retrieve("email", &k1).unwrap();
        assert_eq!(credential.username(), "alice");
        assert_eq!(credential.password(), "s3cr3t");

        let k2 = VaultKey::generate();
        assert!(matches!(
            vault.retrieve("email", &k2),
            Err(VaultError::Authentication)
        ));
    }

    #[test]
    fn test_save_rejects_empty_fields() {
        let (vault, _, _dir) = test_vault();

        assert!(matches!(
            vault.save("", "alice", "pw"),
            Err(VaultError::MissingField("application name"))
        ));
        assert!(matches!(
            vault.save("email", "", "pw"),
            Err(VaultError::MissingField("username"))
        ));
        assert!(matches!(
            vault.save("email", "alice", ""),
            Err(VaultError::MissingField("password"))
        ));
        assert!(!vault.store().exists());
    }

    #[test]
    fn test_retrieve_unknown_label() {
        let (vault, key, _dir) = test_vault();
        vault.save("email", "alice", "pw").unwrap();

        assert!(matches!(
            vault.retrieve("bank", &key),
            Err(VaultError::NotFound(_))
        ));
    }

    #[test]
    fn test_retrieve_uses_first_matching_record() {
        let (vault, key, _dir) = test_vault();
        vault.save("email", "first", "pw1").unwrap();
        vault.save("email", "second", "pw2").unwrap();

        let credential = vault.retrieve("email", &key).unwrap();
        assert_eq!(credential.username(), "first");
        assert_eq!(vault.labels().unwrap(), vec!["email"]);
    }

    #[test]
    fn test_records_from_different_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credentials.csv");
        let k1 = VaultKey::generate();
        let k2 = VaultKey::generate();

        Vault::with_key(RecordStore::new(&path), k1.clone())
            .save("one", "u1", "p1")
            .unwrap();
        Vault::with_key(RecordStore::new(&path), k2.clone())
            .save("two", "u2", "p2")
            .unwrap();

        let store = RecordStore::new(&path);
        assert_eq!(retrieve(&store, "one", &k1).unwrap().username(), "u1");
        assert_eq!(retrieve(&store, "two", &k2).unwrap().username(), "u2");
        assert!(matches!(
            retrieve(&store, "one", &k2),
            Err(VaultError::Authentication)
        ));
    }

    #[test]
    fn test_tampered_password_field_yields_no_plaintext() {
        let (vault, key, _dir) = test_vault();
        let record = vault.save("email", "alice", "s3cr3t").unwrap();

        let mut tampered = record.clone();
        tampered.application_label = "tampered".to_string();
        tampered.encrypted_password = format!("{}AAAA", record.encrypted_password);
        vault.store().append(&tampered).unwrap();

        assert!(matches!(
            vault.retrieve("tampered", &key),
            Err(VaultError::Authentication)
        ));
    }

    #[test]
    fn test_retrieve_with_encoded_key() {
        let (vault, key, _dir) = test_vault();
        vault.save("email", "alice", "s3cr3t").unwrap();

        let credential =
            retrieve_with_encoded_key(vault.store(), "email", &key.encode()).unwrap();
        assert_eq!(credential.password(), "s3cr3t");

        assert!(matches!(
            retrieve_with_encoded_key(vault.store(), "email", "garbage"),
            Err(VaultError::InvalidKey(_))
        ));
        assert!(matches!(
            retrieve_with_encoded_key(vault.store(), "bank", "garbage"),
            Err(VaultError::NotFound(_))
        ));
    }

    #[test]
    fn test_decrypt_record_directly() {
        let (vault, key, _dir) = test_vault();
        let record = vault.save("email", "alice", "s3cr3t").unwrap();

        let credential = decrypt_record(&record, &key).unwrap();
        assert_eq!(credential.username(), "alice");
        assert_eq!(credential.password(), "s3cr3t");

        assert!(matches!(
            decrypt_record(&record, &VaultKey::generate()),
            Err(VaultError::Authentication)
        ));
    }

    #[test]
    fn test_open_requires_key_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths {
            data_file: temp_dir.path().join("credentials.csv"),
            key_file: temp_dir.path().join("key.key"),
        };

        assert!(matches!(
            Vault::open(&paths),
            Err(VaultError::KeyFileMissing(_))
        ));

        let key = create_key_file(&paths.key_file).unwrap();
        let vault = Vault::open(&paths).unwrap();
        vault.save("email", "alice", "s3cr3t").unwrap();

        let credential = retrieve(&RecordStore::new(&paths.data_file), "email", &key).unwrap();
        assert_eq!(credential.username(), "alice");
    }
}
