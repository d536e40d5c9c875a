//! Data model for Horizon Grid list views.
//!
//! This module provides the UI-independent pieces a list view is built from.
//! Each stage of the pipeline is usable on its own:
//!
//! - `DataStore`: the full record set, id-indexed
//! - `FilterEngine`: named predicates combined into one filter
//! - `SortSpec`: optional column sort
//! - `Paginator`: current page and page size
//! - `SelectionTracker`: ids checked for bulk actions
//! - `Summary`: counts and totals for stat cards
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::{DataStore, FilterEngine, FilterSpec, Paginator, Record};
//!
//! let store = DataStore::with_records(
//!     (1..=12).map(|n| Record::new(format!("P{n:03}")).with("n", n)).collect(),
//! )?;
//!
//! let mut filters = FilterEngine::new();
//! filters.set_filter("search", FilterSpec::search("p01"))?;
//! let filtered = filters.evaluate(store.records());
//! assert_eq!(filtered.len(), 3);
//!
//! let pager = Paginator::new(2)?;
//! assert_eq!(pager.get_page(&filtered).len(), 2);
//! # Ok::<(), horizon_grid::GridError>(())
//! ```
//!
//! # Architecture Overview
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌──────────┐   ┌───────────┐
//! │ DataStore │──>│ FilterEngine │──>│ SortSpec │──>│ Paginator │
//! └───────────┘   └──────────────┘   └──────────┘   └───────────┘
//!                                                         │
//!                        ┌──────────────────┐             │
//!                        │ SelectionTracker │<────────────┘
//!                        └──────────────────┘
//! ```
//!
//! [`crate::view::ListController`] drives these stages and renders the
//! result after every change.

mod filter;
mod paginator;
mod record;
pub mod selection;
mod sort;
mod store;
mod summary;
mod value;

pub use filter::{FilterEngine, FilterSpec};
pub use paginator::{DEFAULT_PAGE_SIZE, PageLink, PageMeta, Paginator};
pub use record::{ID_FIELD, Record, RecordId, RecordPatch};
pub use selection::{SelectionMode, SelectionState, SelectionTracker};
pub use sort::{SortDirection, SortSpec};
pub use store::DataStore;
pub use summary::Summary;
pub use value::FieldValue;
