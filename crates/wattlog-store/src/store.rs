//! Main record store implementation.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use wattlog_types::{LOG_HEADER, Reading};

use crate::crypto;
use crate::error::{Error, Result};
use crate::identity::StoreIdentity;

/// Encrypted append-only store for a room's reading history.
///
/// The whole plaintext log is re-encrypted under a fresh salt and IV on
/// every write; the key-stretching cost is paid once per read and per
/// write. Appends are a non-atomic read-modify-write of the entire file,
/// so writers must be serialized by convention; there is no locking.
pub struct RecordStore {
    identity: StoreIdentity,
    passphrase: String,
}

impl RecordStore {
    /// Open the store for a room under the given storage root.
    ///
    /// Resolves the storage location from `(room_name, passphrase)` and
    /// creates the store directory. The encrypted blob itself is only
    /// created on the first append.
    pub fn open(root: &Path, room_name: &str, passphrase: &str) -> Result<Self> {
        let identity = StoreIdentity::resolve(root, room_name, passphrase);

        if !identity.directory().exists() {
            fs::create_dir_all(identity.directory()).map_err(|e| Error::CreateDirectory {
                path: identity.directory().to_path_buf(),
                source: e,
            })?;
        }

        debug!("Opened record store at {}", identity.directory().display());
        Ok(Self {
            identity,
            passphrase: passphrase.to_string(),
        })
    }

    /// The resolved store location.
    pub fn identity(&self) -> &StoreIdentity {
        &self.identity
    }

    /// Whether an encrypted blob exists at this location.
    pub fn exists(&self) -> bool {
        self.identity.blob_path().exists()
    }

    /// Read and decrypt the full plaintext log.
    ///
    /// Fails with [`Error::NotFound`] if no blob exists, which is distinct
    /// from a decryption failure on a present blob.
    pub fn read(&self) -> Result<String> {
        let path = self.identity.blob_path();
        if !path.exists() {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }

        let blob = fs::read(path)?;
        let plain = crypto::decrypt(&blob, &self.passphrase)?;
        String::from_utf8(plain).map_err(|_| Error::NotUtf8)
    }

    /// Encrypt `content` under a fresh salt and IV and rewrite the blob.
    pub fn write(&self, content: &str) -> Result<()> {
        let blob = crypto::encrypt(content.as_bytes(), &self.passphrase)?;
        fs::write(self.identity.blob_path(), blob)?;
        Ok(())
    }

    /// Append a line to the log.
    ///
    /// Initializes the blob with the header line on first use, then
    /// performs a read-decrypt-concatenate-re-encrypt cycle over the full
    /// accumulated history.
    pub fn append(&self, line: &str) -> Result<()> {
        if !self.exists() {
            self.write(&format!("{LOG_HEADER}\n"))?;
        }

        let mut content = self.read()?;
        content.push_str(line);
        self.write(&content)?;

        info!(
            "Appended record to {}",
            self.identity.blob_path().display()
        );
        Ok(())
    }

    /// Append a reading, formatted as a binding-schema log line.
    pub fn append_reading(&self, reading: &Reading) -> Result<()> {
        self.append(&reading.to_log_line())
    }

    /// Read the log and parse it into the reading history, in call order.
    pub fn load_history(&self) -> Result<Vec<Reading>> {
        let content = self.read()?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut history = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let fields: Vec<&str> = record.iter().collect();
            history.push(Reading::from_fields(&fields)?);
        }

        debug!("Loaded {} readings", history.len());
        Ok(history)
    }
}
