//! Persisted per-view preferences.
//!
//! List views remember their page size, sort and filters between sessions
//! through a [`KeyValueStore`]. The store is a port: the controller only
//! needs `get`/`set`/`remove` of JSON values, so an application can back it
//! with browser storage, a database, or one of the two stores provided here:
//!
//! - [`MemoryStore`]: process-local, for tests and ephemeral views
//! - [`JsonFileStore`]: every key in a single JSON object file
//!
//! # Example
//!
//! ```
//! use horizon_grid::file::{KeyValueStore, MemoryStore};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! store.set("parties.preferences", json!({"page_size": 25}))?;
//! assert_eq!(store.get("parties.preferences")?.unwrap()["page_size"], 25);
//! # Ok::<(), horizon_grid::GridError>(())
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GridError, Result};
use crate::model::{FilterSpec, SortSpec};

/// Key suffix under which a view stores its preferences.
pub const PREFERENCES_SUFFIX: &str = "preferences";

/// Synchronous key-value storage for JSON blobs.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Removes `key`. Returns whether it was present.
    fn remove(&self, key: &str) -> Result<bool>;
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored keys in order.
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.data.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.data.write().remove(key).is_some())
    }
}

/// [`KeyValueStore`] backed by one JSON object file.
///
/// The file is read once on [`open`](Self::open) and rewritten atomically
/// (temporary file in the same directory, then rename) on every change, so a
/// crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(GridError::io(path, e)),
        };
        tracing::debug!(
            target: "horizon_grid::preferences",
            path = %path.display(),
            keys = data.len(),
            "opened preference file"
        );
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, data: &BTreeMap<String, Value>) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        write_atomic(&self.path, json.as_bytes())
    }

    fn save_failed(&self, key: &str, error: GridError) -> GridError {
        tracing::warn!(
            target: "horizon_grid::preferences",
            path = %self.path.display(),
            key,
            error = %error,
            "preference file not written"
        );
        GridError::storage(key, error.to_string())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut data = self.data.write();
        let previous = data.insert(key.to_string(), value);
        if let Err(e) = self.save(&data) {
            // Keep memory in step with the file.
            match previous {
                Some(old) => data.insert(key.to_string(), old),
                None => data.remove(key),
            };
            return Err(self.save_failed(key, e));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut data = self.data.write();
        let Some(previous) = data.remove(key) else {
            return Ok(false);
        };
        if let Err(e) = self.save(&data) {
            data.insert(key.to_string(), previous);
            return Err(self.save_failed(key, e));
        }
        Ok(true)
    }
}

// Thread-safe: both stores use RwLock internally
static_assertions::assert_impl_all!(MemoryStore: Send, Sync);
static_assertions::assert_impl_all!(JsonFileStore: Send, Sync);

/// Writes `contents` to `path` through a temporary file and rename.
///
/// If any step fails the original file, if any, is left unchanged.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| GridError::io(path, e))?;
    temp.write_all(contents).map_err(|e| GridError::io(path, e))?;
    temp.as_file().sync_all().map_err(|e| GridError::io(path, e))?;
    temp.persist(path).map_err(|e| GridError::io(path, e.error))?;
    Ok(())
}

/// What a list view remembers between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewPreferences {
    pub page_size: usize,
    #[serde(default)]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub filters: BTreeMap<String, FilterSpec>,
}

impl ViewPreferences {
    /// Storage key for a view.
    pub fn key(view_key: &str) -> String {
        format!("{view_key}.{PREFERENCES_SUFFIX}")
    }

    /// Checks every part of the blob before it is applied.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(GridError::invalid_argument("page size must be positive"));
        }
        if let Some(sort) = &self.sort {
            sort.validate()?;
        }
        for (kind, spec) in &self.filters {
            if kind.trim().is_empty() {
                return Err(GridError::invalid_argument("filter kind is empty"));
            }
            spec.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("horizon_grid_prefs_test_{}_{}", std::process::id(), name))
    }

    fn cleanup(path: &Path) {
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.get("a").unwrap().is_none());

        store.set("a", json!(1)).unwrap();
        store.set("b", json!({"x": true})).unwrap();
        assert_eq!(store.get("a").unwrap(), Some(json!(1)));
        assert_eq!(store.keys(), vec!["a", "b"]);

        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_json_file_store_persists() {
        let path = temp_path("persist.json");
        cleanup(&path);

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.set("parties.preferences", json!({"page_size": 25})).unwrap();
            store.set("services.preferences", json!({"page_size": 5})).unwrap();
            assert!(store.remove("services.preferences").unwrap());
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("parties.preferences").unwrap(),
            Some(json!({"page_size": 25}))
        );
        assert!(reopened.get("services.preferences").unwrap().is_none());

        cleanup(&path);
    }

    #[test]
    fn test_json_file_store_rejects_corrupt_file() {
        let path = temp_path("corrupt.json");
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, GridError::Json(_)));

        cleanup(&path);
    }

    #[test]
    fn test_failed_write_is_storage_error_and_rolls_back() {
        let dir = temp_path("missing_dir");
        fs::remove_dir_all(&dir).ok();
        let store = JsonFileStore::open(dir.join("prefs.json")).unwrap();

        let err = store
            .set("parties.preferences", json!({"page_size": 25}))
            .unwrap_err();
        assert!(err.is_storage());
        assert!(matches!(&err, GridError::Storage { key, .. } if key == "parties.preferences"));
        assert!(store.get("parties.preferences").unwrap().is_none());
    }

    #[test]
    fn test_failed_remove_keeps_value() {
        let dir = temp_path("vanishing_dir");
        fs::create_dir_all(&dir).unwrap();
        let store = JsonFileStore::open(dir.join("prefs.json")).unwrap();
        store.set("services.preferences", json!({"page_size": 5})).unwrap();

        fs::remove_dir_all(&dir).unwrap();
        let err = store.remove("services.preferences").unwrap_err();
        assert!(matches!(&err, GridError::Storage { key, .. } if key == "services.preferences"));
        assert_eq!(
            store.get("services.preferences").unwrap(),
            Some(json!({"page_size": 5}))
        );
    }

    #[test]
    fn test_preferences_key_and_validation() {
        assert_eq!(ViewPreferences::key("parties"), "parties.preferences");

        let prefs: ViewPreferences = serde_json::from_value(json!({
            "page_size": 20,
            "sort": {"field": "name", "direction": "descending"},
            "filters": {
                "category": {"type": "one_of", "field": "partyType", "values": ["Vendor"]}
            }
        }))
        .unwrap();
        prefs.validate().unwrap();
        assert_eq!(prefs.sort, Some(SortSpec::descending("name")));

        let bad = ViewPreferences {
            page_size: 0,
            sort: None,
            filters: BTreeMap::new(),
        };
        assert!(bad.validate().unwrap_err().is_invalid_argument());
    }
}
