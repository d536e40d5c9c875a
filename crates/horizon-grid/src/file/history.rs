//! Recently applied filter sets.
//!
//! [`FilterHistory`] keeps the last few filter combinations a user applied so
//! a "recent filters" menu can re-apply them. Entries are newest first and
//! persisted as one JSON array in a [`KeyValueStore`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::preferences::KeyValueStore;
use crate::config::ListViewConfig;
use crate::error::Result;
use crate::model::{FilterEngine, FilterSpec};

/// Default number of entries kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Key suffix for a view's history in a [`KeyValueStore`].
pub const HISTORY_SUFFIX: &str = "history";

/// One applied filter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub recorded_at: DateTime<Utc>,
    /// Human-readable summary; entries with equal descriptions are merged.
    pub description: String,
    pub filters: BTreeMap<String, FilterSpec>,
    /// Filtered record count when the entry was recorded.
    pub result_count: usize,
}

/// Most-recent-first list of applied filter sets.
pub struct FilterHistory {
    store: Arc<dyn KeyValueStore>,
    key: String,
    limit: usize,
    entries: Vec<HistoryEntry>,
}

impl FilterHistory {
    /// Loads the history stored under `key`.
    ///
    /// A blob that does not parse is logged and treated as empty history.
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>, limit: usize) -> Result<Self> {
        let key = key.into();
        let mut entries: Vec<HistoryEntry> = match store.get(&key)? {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(target: "horizon_grid::file", key = %key, error = %e, "ignoring malformed filter history");
                Vec::new()
            }),
            None => Vec::new(),
        };
        let limit = limit.max(1);
        entries.truncate(limit);
        Ok(Self {
            store,
            key,
            limit,
            entries,
        })
    }

    /// Loads the history of a view, keeping at most
    /// [`history_limit`](ListViewConfig::history_limit) entries.
    pub fn for_view(store: Arc<dyn KeyValueStore>, view_key: &str, config: &ListViewConfig) -> Result<Self> {
        Self::load(store, Self::key(view_key), config.history_limit)
    }

    /// Storage key for a view.
    pub fn key(view_key: &str) -> String {
        format!("{view_key}.{HISTORY_SUFFIX}")
    }

    /// Records the active filters of `filters`.
    ///
    /// Returns `None` without recording when no filter is active. An entry
    /// with the same description as an existing one replaces it at the front.
    pub fn record(&mut self, filters: &FilterEngine, result_count: usize) -> Result<Option<&HistoryEntry>> {
        if filters.is_empty() {
            return Ok(None);
        }
        let description = filters.describe();
        let active: BTreeMap<String, FilterSpec> = filters
            .specs()
            .iter()
            .filter(|(_, spec)| spec.is_restrictive())
            .map(|(kind, spec)| (kind.clone(), spec.clone()))
            .collect();

        let mut entries = self.entries.clone();
        entries.retain(|e| e.description != description);
        let id = self.entries.iter().map(|e| e.id).max().map_or(1, |max| max + 1);
        entries.insert(
            0,
            HistoryEntry {
                id,
                recorded_at: Utc::now(),
                description,
                filters: active,
                result_count,
            },
        );
        entries.truncate(self.limit);

        self.store.set(&self.key, serde_json::to_value(&entries)?)?;
        self.entries = entries;
        tracing::debug!(target: "horizon_grid::file", id, count = self.entries.len(), "filter history recorded");
        Ok(self.entries.first())
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: u64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Forgets every entry and removes the stored key.
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(&self.key)?;
        self.entries.clear();
        Ok(())
    }
}

impl std::fmt::Debug for FilterHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterHistory")
            .field("key", &self.key)
            .field("limit", &self.limit)
            .field("entries", &self.entries.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(FilterHistory: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::MemoryStore;

    fn engine(query: &str) -> FilterEngine {
        let mut engine = FilterEngine::new();
        engine.set_filter("search", FilterSpec::search(query)).unwrap();
        engine
    }

    #[test]
    fn test_newest_first_and_dedup() {
        let store = Arc::new(MemoryStore::new());
        let mut history = FilterHistory::load(store, "parties.history", 20).unwrap();

        history.record(&engine("acme"), 1).unwrap();
        history.record(&engine("globex"), 2).unwrap();
        history.record(&engine("acme"), 3).unwrap();

        let descriptions: Vec<&str> = history.entries().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, vec!["search: \"acme\"", "search: \"globex\""]);
        assert_eq!(history.latest().unwrap().result_count, 3);
        assert_eq!(history.latest().unwrap().id, 3);
    }

    #[test]
    fn test_inactive_filters_not_recorded() {
        let store = Arc::new(MemoryStore::new());
        let mut history = FilterHistory::load(store, "h", 20).unwrap();
        assert!(history.record(&FilterEngine::new(), 10).unwrap().is_none());
        assert!(history.record(&engine("  "), 10).unwrap().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn test_limit_enforced() {
        let store = Arc::new(MemoryStore::new());
        let mut history = FilterHistory::load(store, "h", 3).unwrap();
        for q in ["a", "b", "c", "d"] {
            history.record(&engine(q), 0).unwrap();
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.entries()[2].description, "search: \"b\"");
    }

    #[test]
    fn test_persisted_and_cleared() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut history = FilterHistory::load(store.clone(), "h", 20).unwrap();
            history.record(&engine("acme"), 1).unwrap();
        }

        let mut reloaded = FilterHistory::load(store.clone(), "h", 20).unwrap();
        assert_eq!(reloaded.len(), 1);
        let entry = reloaded.get(1).unwrap();
        assert_eq!(entry.filters.get("search"), Some(&FilterSpec::search("acme")));

        reloaded.clear().unwrap();
        assert!(reloaded.is_empty());
        assert!(store.get("h").unwrap().is_none());
    }

    #[test]
    fn test_for_view_uses_config_limit() {
        let store = Arc::new(MemoryStore::new());
        let config = ListViewConfig {
            history_limit: 2,
            ..ListViewConfig::default()
        };
        let mut history = FilterHistory::for_view(store.clone(), "services", &config).unwrap();
        assert_eq!(history.limit(), 2);
        for q in ["oil change", "brakes", "tyres"] {
            history.record(&engine(q), 1).unwrap();
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[1].description, "search: \"brakes\"");

        let stored = store.get("services.history").unwrap().unwrap();
        assert_eq!(stored.as_array().map(Vec::len), Some(2));

        // A smaller limit on reload truncates what was stored.
        let narrow = ListViewConfig {
            history_limit: 1,
            ..ListViewConfig::default()
        };
        let reloaded = FilterHistory::for_view(store, "services", &narrow).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.latest().unwrap().description, "search: \"tyres\"");
    }

    #[test]
    fn test_malformed_blob_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set("h", serde_json::json!({"not": "a list"})).unwrap();
        let history = FilterHistory::load(store, "h", 20).unwrap();
        assert!(history.is_empty());
    }
}
