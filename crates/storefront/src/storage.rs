//! Durable key-value storage for persisted state slices.
//!
//! Every persisted slice (site content, dishes, categories, ...) is stored
//! as one JSON document under a fixed namespaced key. Storage is
//! synchronous; callers write after every mutation and read once at
//! startup.
//!
//! # Backends
//!
//! - [`FileStorage`] - one `<key>.json` file per key in a data directory
//! - [`MemoryStorage`] - in-process map, used in tests and ephemeral setups

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Fixed storage keys, one per persisted slice.
pub mod keys {
    pub const SITE_CONTENT: &str = "bistro.siteContent";
    pub const DISHES: &str = "bistro.dishes";
    pub const CATEGORIES: &str = "bistro.categories";
    pub const GALLERY: &str = "bistro.gallery";
    pub const TESTIMONIALS: &str = "bistro.testimonials";
    pub const DESIGN: &str = "bistro.design";
    pub const SUBSCRIBERS: &str = "bistro.subscribers";
    pub const CONTACT_SUBMISSIONS: &str = "bistro.contactSubmissions";

    /// The six slices owned by the domain store.
    pub const DOMAIN_SLICES: [&str; 6] = [
        SITE_CONTENT,
        DISHES,
        CATEGORIES,
        GALLERY,
        TESTIMONIALS,
        DESIGN,
    ];

    /// Session key holding the visitor's cart.
    pub const CART: &str = "bistro.cart";

    /// Session key marking an authenticated admin.
    pub const ADMIN_AUTH: &str = "bistro.adminAuth";
}

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage cannot be used in this execution context.
    #[error("storage is not available")]
    Unavailable,

    /// The value is larger than the backend accepts.
    #[error("storage quota exceeded for {key}: {size} bytes (limit {limit})")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    /// The key cannot be mapped onto the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Reading or writing the backing file failed.
    #[error("I/O error for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be serialized or parsed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Synchronous string key-value storage.
pub trait KeyValueStorage: Send + Sync {
    /// Whether persistent storage can be used in this execution context.
    fn is_available(&self) -> bool;

    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and parse the JSON document stored under `key`.
///
/// # Errors
///
/// Returns an error if the read fails or the stored value does not parse.
pub fn read_json<T: DeserializeOwned>(
    storage: &dyn KeyValueStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    storage
        .get(key)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(StorageError::from)
}

/// Serialize `value` and store it under `key`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn KeyValueStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}

/// Outcome of writing state to storage after a mutation.
///
/// A failed write never undoes the in-memory change, so memory and storage
/// may differ until the next successful write.
#[derive(Debug)]
pub enum Persistence {
    /// All slices were written.
    Saved,
    /// Nothing changed, so nothing was written.
    Unchanged,
    /// Storage is not available in this context; the change lives in memory only.
    Unavailable,
    /// The write failed; the change lives in memory only.
    Failed(StorageError),
}

impl Persistence {
    /// Build the outcome of a write attempt, logging failures.
    #[must_use]
    pub fn from_result(what: &str, result: Result<(), StorageError>) -> Self {
        match result {
            Ok(()) => Self::Saved,
            Err(StorageError::Unavailable) => Self::Unavailable,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    what,
                    "Failed to persist state; keeping in-memory changes"
                );
                Self::Failed(e)
            }
        }
    }

    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved | Self::Unchanged)
    }

    /// User-facing warning for outcomes where the change was not saved.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Saved | Self::Unchanged => None,
            Self::Unavailable => {
                Some("Storage is unavailable; this change will be lost on restart.".to_string())
            }
            Self::Failed(e) => Some(format!(
                "The change was applied but could not be saved ({e}); it will be lost on restart."
            )),
        }
    }
}

// =============================================================================
// File Storage
// =============================================================================

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary file that is then renamed over the target, so
/// a crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStorage {
    /// Open storage rooted at `dir`, creating the directory if needed.
    ///
    /// A directory that cannot be created leaves the storage unavailable
    /// rather than failing, matching how the store treats missing storage.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "Could not create storage directory");
        }
        Self { dir, quota: None }
    }

    /// Reject values larger than `bytes`.
    #[must_use]
    pub const fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// The directory holding the stored documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.is_available() {
            return Err(StorageError::Unavailable);
        }
        if let Some(limit) = self.quota
            && value.len() > limit
        {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                size: value.len(),
                limit,
            });
        }

        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

// =============================================================================
// Memory Storage
// =============================================================================

/// In-process storage.
///
/// Can be created unavailable (to model a context without persistent
/// storage) or with a per-value quota (to model quota failures).
#[derive(Debug)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    available: bool,
    quota: Option<usize>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            available: true,
            quota: None,
        }
    }

    /// Storage that reports itself unavailable and rejects writes.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Reject values larger than `bytes`.
    #[must_use]
    pub const fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn is_available(&self) -> bool {
        self.available
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        if let Some(limit) = self.quota
            && value.len() > limit
        {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                size: value.len(),
                limit,
            });
        }
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path());
        assert!(storage.is_available());
        assert_eq!(storage.get(keys::DISHES).unwrap(), None);

        storage.set(keys::DISHES, "[]").unwrap();
        assert_eq!(storage.get(keys::DISHES).unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("bistro.dishes.json").exists());

        storage.remove(keys::DISHES).unwrap();
        storage.remove(keys::DISHES).unwrap();
        assert_eq!(storage.get(keys::DISHES).unwrap(), None);
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path());
        assert!(matches!(
            storage.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.get("a/b"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_file_storage_quota() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).with_quota(4);
        assert!(storage.set(keys::GALLERY, "[]").is_ok());
        assert!(matches!(
            storage.set(keys::GALLERY, "[1,2,3]"),
            Err(StorageError::QuotaExceeded { limit: 4, .. })
        ));
        assert_eq!(storage.get(keys::GALLERY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_storage_unavailable() {
        let storage = MemoryStorage::unavailable();
        assert!(!storage.is_available());
        assert!(matches!(
            storage.set(keys::DESIGN, "{}"),
            Err(StorageError::Unavailable)
        ));
    }

    #[test]
    fn test_json_helpers() {
        let storage = MemoryStorage::new();
        write_json(&storage, "k", &vec![1, 2, 3]).unwrap();
        let back: Option<Vec<i32>> = read_json(&storage, "k").unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));

        storage.set("bad", "{not json").unwrap();
        assert!(matches!(
            read_json::<Vec<i32>>(&storage, "bad"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_persistence_warning() {
        assert!(Persistence::Saved.warning().is_none());
        let failed = Persistence::from_result(
            "test",
            Err(StorageError::QuotaExceeded {
                key: "k".into(),
                size: 10,
                limit: 1,
            }),
        );
        assert!(!failed.is_saved());
        assert!(failed.warning().unwrap().contains("quota"));
        assert!(matches!(
            Persistence::from_result("test", Err(StorageError::Unavailable)),
            Persistence::Unavailable
        ));
    }
}
