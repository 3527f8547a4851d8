//! Deterministic store location derivation.

use std::path::{Path, PathBuf};

use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Filename of the encrypted blob inside a store directory.
const BLOB_FILENAME: &str = "log.enc";

/// A filesystem location derived from `(room name, passphrase)`.
///
/// The directory name is the hex digest of HMAC-SHA1 keyed by the
/// passphrase over the room name, so the same pair always resolves to the
/// same location while different passphrases for the same room map to
/// mutually unguessable locations. The passphrase itself never appears on
/// disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreIdentity {
    digest: String,
    directory: PathBuf,
    blob_path: PathBuf,
}

impl StoreIdentity {
    /// Resolve the store location for a room under the given root.
    pub fn resolve(root: &Path, room_name: &str, passphrase: &str) -> Self {
        let mut mac = HmacSha1::new_from_slice(passphrase.as_bytes())
            .expect("HMAC can take keys of any size");
        mac.update(room_name.as_bytes());
        let digest = hex::encode(mac.finalize().into_bytes());

        let directory = root.join(&digest);
        let blob_path = directory.join(BLOB_FILENAME);
        Self {
            digest,
            directory,
            blob_path,
        }
    }

    /// Hex digest naming the store directory.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Directory holding the encrypted blob.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Full path of the encrypted blob.
    pub fn blob_path(&self) -> &Path {
        &self.blob_path
    }
}
