//! Persistence and export for list views.
//!
//! # Preferences
//!
//! ```ignore
//! use std::sync::Arc;
//! use horizon_grid::file::JsonFileStore;
//!
//! let store = Arc::new(JsonFileStore::open("preferences.json")?);
//! controller.attach_preferences(store, "parties");
//!
//! // Later: remember page size, sort and filters
//! controller.save_preferences()?;
//!
//! // Next session
//! controller.restore_preferences()?;
//! ```
//!
//! # Recent Filters
//!
//! ```ignore
//! // Sized by `ListViewConfig::history_limit`, stored next to the preferences
//! let mut history = controller.filter_history()?;
//! history.record(controller.filters(), controller.filtered_len())?;
//!
//! for entry in history.entries() {
//!     println!("{} ({} results)", entry.description, entry.result_count);
//! }
//! ```
//!
//! # CSV Export
//!
//! ```ignore
//! let mut file = std::fs::File::create("parties.csv")?;
//! controller.export_filtered_csv(&mut file, &["id", "name", "partyType"])?;
//! ```

mod export;
mod history;
mod preferences;

pub use export::{
    CsvExportOptions, default_columns, export_csv, export_csv_file, export_csv_with_options,
};
pub use history::{DEFAULT_HISTORY_LIMIT, FilterHistory, HISTORY_SUFFIX, HistoryEntry};
pub use preferences::{
    JsonFileStore, KeyValueStore, MemoryStore, PREFERENCES_SUFFIX, ViewPreferences,
};
