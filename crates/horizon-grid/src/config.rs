//! Per-view configuration.
//!
//! A [`ListViewConfig`] captures the defaults a list view starts with. It is
//! plain serde data, so dashboards can keep one TOML or JSON file per view:
//!
//! ```toml
//! page_size = 8
//! search_fields = ["name", "city"]
//! selection_mode = "multi_selection"
//!
//! [default_sort]
//! field = "name"
//! direction = "ascending"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::file::DEFAULT_HISTORY_LIMIT;
use crate::model::{DEFAULT_PAGE_SIZE, SelectionMode, SortSpec};

/// Default filter kind used by free-text search.
pub const DEFAULT_SEARCH_KIND: &str = "search";

/// Startup settings for a list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListViewConfig {
    /// Rows per page.
    pub page_size: usize,
    /// Filter kind that [`set_search`](crate::view::ListController::set_search) writes.
    pub search_kind: String,
    /// Fields searched by free text; empty searches every field.
    pub search_fields: Vec<String>,
    pub default_sort: Option<SortSpec>,
    pub selection_mode: SelectionMode,
    /// Entries kept by the view's history; see
    /// [`FilterHistory::for_view`](crate::file::FilterHistory::for_view).
    pub history_limit: usize,
}

impl Default for ListViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_kind: DEFAULT_SEARCH_KIND.to_string(),
            search_fields: Vec::new(),
            default_sort: None,
            selection_mode: SelectionMode::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ListViewConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file; `.json` files are read as JSON, anything else as
    /// TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| GridError::io(path, e))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(GridError::invalid_argument("page size must be positive"));
        }
        if self.search_kind.trim().is_empty() {
            return Err(GridError::invalid_argument("search kind is empty"));
        }
        if self.search_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(GridError::invalid_argument("search field name is empty"));
        }
        if let Some(sort) = &self.default_sort {
            sort.validate()?;
        }
        if self.history_limit == 0 {
            return Err(GridError::invalid_argument("history limit must be positive"));
        }
        Ok(())
    }
}
