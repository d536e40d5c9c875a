//! The rendering port of a list view.
//!
//! The controller never draws anything itself. After every state change it
//! builds a [`ViewSnapshot`] and hands it to a [`ViewRenderer`], which may
//! paint widgets, emit HTML, or (in tests) simply record what it was given.
//!
//! Any `FnMut(&ViewSnapshot)` closure is a renderer:
//!
//! ```
//! use horizon_grid::view::{ViewRenderer, ViewSnapshot};
//!
//! let mut draws = 0;
//! let mut renderer = |snapshot: &ViewSnapshot| {
//!     draws += 1;
//!     println!("{}", snapshot.page.range_label());
//! };
//! renderer.render(&ViewSnapshot::default());
//! assert_eq!(draws, 1);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::model::{PageMeta, Record, SelectionState, SortSpec};

/// Receives a fresh snapshot after every state transition.
pub trait ViewRenderer {
    /// Redraws the view. Called exactly once per transition.
    fn render(&mut self, snapshot: &ViewSnapshot);
}

impl<F> ViewRenderer for F
where
    F: FnMut(&ViewSnapshot),
{
    fn render(&mut self, snapshot: &ViewSnapshot) {
        self(snapshot)
    }
}

/// A visible row and whether its checkbox is ticked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    pub record: Record,
    pub selected: bool,
}

/// Everything a renderer needs to draw the current page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    /// Rows of the current page, in display order.
    pub rows: Vec<ViewRow>,
    /// Tri-state of the page's "select all" checkbox.
    pub selection_state: SelectionState,
    /// Selected records across all pages.
    pub selected_count: usize,
    pub page: PageMeta,
    /// Size of the unfiltered record set.
    pub total_records: usize,
    pub sort: Option<SortSpec>,
    /// Filter kinds currently restricting results.
    pub active_filters: Vec<String>,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            selection_state: SelectionState::None,
            selected_count: 0,
            page: PageMeta {
                page: 1,
                page_size: crate::model::DEFAULT_PAGE_SIZE,
                page_count: 0,
                total_items: 0,
                first_item: 0,
                last_item: 0,
                has_previous: false,
                has_next: false,
            },
            total_records: 0,
            sort: None,
            active_filters: Vec::new(),
        }
    }
}

impl ViewSnapshot {
    /// True for the "no results" state.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ids of the visible rows.
    pub fn row_ids(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.record.id().as_str()).collect()
    }

    /// Number of filtered records across all pages.
    pub fn filtered_count(&self) -> usize {
        self.page.total_items
    }
}

/// A renderer that keeps every snapshot it receives.
///
/// Clones share the same log, so one handle can be given to a controller
/// while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct SnapshotLog {
    snapshots: Arc<Mutex<Vec<ViewSnapshot>>>,
}

impl SnapshotLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of renders so far.
    pub fn len(&self) -> usize {
        self.snapshots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.lock().is_empty()
    }

    /// The most recent snapshot.
    pub fn last(&self) -> Option<ViewSnapshot> {
        self.snapshots.lock().last().cloned()
    }

    /// All snapshots in render order.
    pub fn snapshots(&self) -> Vec<ViewSnapshot> {
        self.snapshots.lock().clone()
    }

    /// Forgets recorded snapshots.
    pub fn clear(&self) {
        self.snapshots.lock().clear();
    }
}

impl ViewRenderer for SnapshotLog {
    fn render(&mut self, snapshot: &ViewSnapshot) {
        self.snapshots.lock().push(snapshot.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_renderer() {
        let mut seen = Vec::new();
        {
            let mut renderer = |s: &ViewSnapshot| seen.push(s.selected_count);
            renderer.render(&ViewSnapshot::default());
            renderer.render(&ViewSnapshot {
                selected_count: 2,
                ..ViewSnapshot::default()
            });
        }
        assert_eq!(seen, vec![0, 2]);
    }

    #[test]
    fn test_snapshot_log_shares_state() {
        let log = SnapshotLog::new();
        let mut handle: Box<dyn ViewRenderer> = Box::new(log.clone());
        handle.render(&ViewSnapshot::default());

        assert_eq!(log.len(), 1);
        assert!(log.last().unwrap().is_empty());
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_row_ids() {
        let snapshot = ViewSnapshot {
            rows: vec![
                ViewRow {
                    record: Record::new("P001"),
                    selected: true,
                },
                ViewRow {
                    record: Record::new("P002"),
                    selected: false,
                },
            ],
            ..ViewSnapshot::default()
        };
        assert_eq!(snapshot.row_ids(), vec!["P001", "P002"]);
        assert!(!snapshot.is_empty());
    }
}
