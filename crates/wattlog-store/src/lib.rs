//! Encrypted, passphrase-keyed record store for reading history.
//!
//! The store persists a room's balance readings as a single encrypted
//! flat file. The location is derived from `(room name, passphrase)` via
//! a keyed hash, the payload is AES-256-CBC under a scrypt-derived key,
//! and the passphrase is the sole secret, and nothing derived from it is
//! ever written to disk.
//!
//! # Example
//!
//! ```no_run
//! use wattlog_store::{RecordStore, default_store_root};
//!
//! let root = default_store_root();
//! let store = RecordStore::open(&root, "west-5-312", "passphrase")?;
//! let history = store.load_history()?;
//! # Ok::<(), wattlog_store::Error>(())
//! ```

mod crypto;
mod error;
mod identity;
mod store;

pub use crypto::{decrypt, encrypt};
pub use error::{Error, Result};
pub use identity::StoreIdentity;
pub use store::RecordStore;

/// Default storage root following platform conventions.
///
/// - Linux: `~/.local/share/wattlog/logs`
/// - macOS: `~/Library/Application Support/wattlog/logs`
/// - Windows: `C:\Users\<user>\AppData\Local\wattlog\logs`
pub fn default_store_root() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("wattlog")
        .join("logs")
}
