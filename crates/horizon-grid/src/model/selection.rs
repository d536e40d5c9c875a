//! Selection tracking for list views.
//!
//! [`SelectionTracker`] holds the set of record ids checked for a bulk
//! action. The set is independent of filtering and paging: a record stays
//! selected while it is hidden by a filter or sits on another page, and is
//! only dropped when explicitly deselected or removed from the data store.
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::{RecordId, SelectionState, SelectionTracker};
//!
//! let mut selection = SelectionTracker::new();
//! let page: Vec<RecordId> = ["P001", "P002", "P003"].map(RecordId::from).to_vec();
//!
//! selection.selection_changed.connect(|(selected, deselected)| {
//!     println!("Selection changed: +{} -{}", selected.len(), deselected.len());
//! });
//!
//! selection.toggle(&page[0]);
//! assert_eq!(selection.state(&page), SelectionState::Partial);
//!
//! selection.select_all(&page);
//! assert_eq!(selection.state(&page), SelectionState::All);
//! ```

use std::collections::HashSet;

use horizon_grid_core::Signal;
use serde::{Deserialize, Serialize};

use super::record::RecordId;

/// How many records may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Selection is disabled.
    NoSelection,
    /// At most one record; selecting another replaces it.
    SingleSelection,
    /// Any number of records (default).
    #[default]
    MultiSelection,
}

/// Tri-state of the "select all" checkbox for the visible page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    /// No visible record is selected.
    None,
    /// Some, but not all, visible records are selected.
    Partial,
    /// Every visible record is selected.
    All,
}

/// The set of selected record ids.
///
/// # Signals
///
/// - `selection_changed`: emitted with `(selected, deselected)` ids whenever
///   the set actually changes
pub struct SelectionTracker {
    mode: SelectionMode,

    /// O(1) membership.
    selected: HashSet<RecordId>,

    /// Selection order.
    order: Vec<RecordId>,

    /// Emitted when selection changes. Args: (selected, deselected)
    pub selection_changed: Signal<(Vec<RecordId>, Vec<RecordId>)>,
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionTracker {
    /// Creates an empty tracker in multi-selection mode.
    pub fn new() -> Self {
        Self::with_mode(SelectionMode::default())
    }

    /// Creates an empty tracker with the given mode.
    pub fn with_mode(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected: HashSet::new(),
            order: Vec::new(),
            selection_changed: Signal::new(),
        }
    }

    /// Gets the selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    /// Sets the selection mode.
    ///
    /// Switching to [`SelectionMode::NoSelection`] clears the set; switching
    /// to [`SelectionMode::SingleSelection`] keeps only the most recently
    /// selected id.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        let keep = match mode {
            SelectionMode::NoSelection => 0,
            SelectionMode::SingleSelection => 1,
            SelectionMode::MultiSelection => return,
        };
        if self.order.len() > keep {
            let excess = self.order.len() - keep;
            let dropped: Vec<RecordId> = self.order.drain(..excess).collect();
            for id in &dropped {
                self.selected.remove(id);
            }
            self.notify(Vec::new(), dropped);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns true if the id is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[RecordId] {
        &self.order
    }

    /// Tri-state of the selection relative to the visible ids.
    ///
    /// `All` requires at least one visible id; an empty page is `None`.
    pub fn state(&self, visible: &[RecordId]) -> SelectionState {
        let selected = visible
            .iter()
            .filter(|id| self.selected.contains(*id))
            .count();
        if selected == 0 {
            SelectionState::None
        } else if selected == visible.len() {
            SelectionState::All
        } else {
            SelectionState::Partial
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Selects an id. Returns true if the set changed.
    pub fn select(&mut self, id: &RecordId) -> bool {
        if self.mode == SelectionMode::NoSelection || self.selected.contains(id) {
            return false;
        }
        let deselected = if self.mode == SelectionMode::SingleSelection {
            self.take_all()
        } else {
            Vec::new()
        };
        self.insert(id.clone());
        self.notify(vec![id.clone()], deselected);
        true
    }

    /// Deselects an id. Returns true if the set changed.
    pub fn deselect(&mut self, id: &str) -> bool {
        match self.take(id) {
            Some(removed) => {
                self.notify(Vec::new(), vec![removed]);
                true
            }
            None => false,
        }
    }

    /// Flips an id's selection. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &RecordId) -> bool {
        if self.selected.contains(id) {
            self.deselect(id.as_str());
            false
        } else {
            self.select(id)
        }
    }

    /// Selects every id in `visible`, keeping selections elsewhere.
    ///
    /// Only multi-selection mode supports selecting a whole page.
    pub fn select_all(&mut self, visible: &[RecordId]) {
        if self.mode != SelectionMode::MultiSelection {
            return;
        }
        let mut added = Vec::new();
        for id in visible {
            if !self.selected.contains(id) {
                self.insert(id.clone());
                added.push(id.clone());
            }
        }
        self.notify(added, Vec::new());
    }

    /// Deselects every id in `visible`, keeping selections elsewhere.
    pub fn deselect_all(&mut self, visible: &[RecordId]) {
        let targets: HashSet<&RecordId> = visible.iter().collect();
        let removed = self.drain_where(|id| targets.contains(id));
        self.notify(Vec::new(), removed);
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        let removed = self.take_all();
        self.notify(Vec::new(), removed);
    }

    /// Drops an id that left the data store. Returns true if it was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        self.deselect(id)
    }

    /// Keeps only the ids for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&RecordId) -> bool,
    {
        let removed = self.drain_where(|id| !keep(id));
        self.notify(Vec::new(), removed);
    }

    fn insert(&mut self, id: RecordId) {
        self.selected.insert(id.clone());
        self.order.push(id);
    }

    fn take(&mut self, id: &str) -> Option<RecordId> {
        if !self.selected.remove(id) {
            return None;
        }
        let position = self.order.iter().position(|s| s.as_str() == id)?;
        Some(self.order.remove(position))
    }

    fn take_all(&mut self) -> Vec<RecordId> {
        self.selected.clear();
        std::mem::take(&mut self.order)
    }

    fn drain_where<F>(&mut self, mut pred: F) -> Vec<RecordId>
    where
        F: FnMut(&RecordId) -> bool,
    {
        let (removed, kept): (Vec<RecordId>, Vec<RecordId>) =
            std::mem::take(&mut self.order).into_iter().partition(|id| pred(id));
        for id in &removed {
            self.selected.remove(id);
        }
        self.order = kept;
        removed
    }

    fn notify(&self, selected: Vec<RecordId>, deselected: Vec<RecordId>) {
        if selected.is_empty() && deselected.is_empty() {
            return;
        }
        tracing::trace!(
            target: "horizon_grid::selection",
            selected = selected.len(),
            deselected = deselected.len(),
            total = self.order.len(),
            "selection changed"
        );
        self.selection_changed.emit((selected, deselected));
    }
}

impl std::fmt::Debug for SelectionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionTracker")
            .field("mode", &self.mode)
            .field("selected", &self.order)
            .finish()
    }
}

// Thread-safe: the tracker holds plain data and a Signal
static_assertions::assert_impl_all!(SelectionTracker: Send, Sync);
