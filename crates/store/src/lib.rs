//! JSON-file key-value persistence.
//!
//! One JSON document per key under a store directory. Backs the
//! categories map, playtime records and the library metadata cache.

pub mod categories;
pub mod playtime;

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub use categories::{
    CategoryMap, assign_category, export_categories, import_categories, load_categories,
    merge_categories, save_categories, unassign_category,
};
pub use playtime::{PlaytimeMap, PlaytimeRecord, load_playtime, record_session, save_playtime};

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A directory of JSON documents, one per key.
///
/// Writes are whole-document, last write wins. No locking; the store is
/// owned by a single process.
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Opens the store at the platform default location.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::new(default_store_dir())
    }

    /// Reads and deserializes the document for `key`.
    ///
    /// Returns `Ok(None)` when the key has never been written.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Serializes and writes the document for `key`.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let path = self.key_path(key);
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, &json)?;
        set_permissions_0600(&path);
        debug!(key, path = %path.display(), "store document written");
        Ok(())
    }

    /// Directory the store lives in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

/// Returns the platform default store directory.
///
/// `$XDG_DATA_HOME/gamedock`, falling back to `~/.local/share/gamedock`.
pub fn default_store_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("gamedock")
}

fn set_permissions_0600(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
}
