//! The list-view controller.
//!
//! [`ListController`] owns one list view's state: the record set, its
//! filters, the sort, the page and the selection. Every operation runs the
//! same pipeline (filter, sort, paginate) and then hands exactly one
//! [`ViewSnapshot`] to the renderer. Operations that fail return an error
//! before touching any state, so the renderer only ever sees consistent
//! views.
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::{FilterSpec, Record};
//! use horizon_grid::view::{ListController, SnapshotLog};
//!
//! let parties = vec![
//!     Record::new("P001").with("name", "Acme Corporation").with("partyType", "Customer"),
//!     Record::new("P002").with("name", "Global Supplies Inc").with("partyType", "Vendor"),
//!     Record::new("P003").with("name", "Globex").with("partyType", "Prospect"),
//! ];
//!
//! let log = SnapshotLog::new();
//! let mut controller = ListController::new(parties, log.clone())?;
//!
//! controller.set_filter("category", FilterSpec::one_of("partyType", ["Customer", "Vendor"]))?;
//! controller.set_search("glob")?;
//!
//! let snapshot = log.last().unwrap();
//! assert_eq!(snapshot.row_ids(), vec!["P002"]);
//! assert_eq!(log.len(), 3);
//! # Ok::<(), horizon_grid::GridError>(())
//! ```
//!
//! # Signals
//!
//! - `records_changed`: the record set was loaded or mutated
//! - `filters_changed`: the active filter kinds changed
//! - `page_changed`: the page position or page count changed
//! - `selection_changed`: forwarded from the selection tracker

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use horizon_grid_core::{PerfSpan, Signal};

use super::renderer::{ViewRenderer, ViewRow, ViewSnapshot};
use crate::config::ListViewConfig;
use crate::error::{GridError, Result};
use crate::file::{FilterHistory, HistoryEntry, KeyValueStore, ViewPreferences, export_csv};
use crate::model::{
    DataStore, FieldValue, FilterEngine, FilterSpec, PageMeta, Paginator, Record, RecordId,
    RecordPatch, SelectionState, SelectionTracker, SortSpec, Summary,
};

/// What happened to the record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordsChange {
    /// The record set was replaced and view state reset.
    Loaded { count: usize },
    /// The record set was replaced keeping filters, sort and page.
    Refreshed { count: usize },
    Added(RecordId),
    Updated(RecordId),
    Removed(Vec<RecordId>),
}

/// Signals emitted by a [`ListController`].
pub struct ListSignals {
    /// Emitted after the record set changes.
    pub records_changed: Signal<RecordsChange>,
    /// Emitted with the active filter kinds after filters change.
    pub filters_changed: Signal<Vec<String>>,
    /// Emitted when the page position or page count changes.
    pub page_changed: Signal<PageMeta>,
}

impl ListSignals {
    fn new() -> Self {
        Self {
            records_changed: Signal::new(),
            filters_changed: Signal::new(),
            page_changed: Signal::new(),
        }
    }
}

impl std::fmt::Debug for ListSignals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListSignals")
            .field("records_changed", &self.records_changed)
            .field("filters_changed", &self.filters_changed)
            .field("page_changed", &self.page_changed)
            .finish()
    }
}

struct PreferenceBinding {
    store: Arc<dyn KeyValueStore>,
    view_key: String,
}

/// Controller for one filterable, paginated, selectable list view.
pub struct ListController {
    store: DataStore,
    filters: FilterEngine,
    sort: Option<SortSpec>,
    paginator: Paginator,
    selection: SelectionTracker,
    config: ListViewConfig,

    /// Store positions of the filtered, sorted records.
    view: Vec<usize>,
    /// Store revision `view` was computed from; `None` forces a recompute.
    view_revision: Option<u64>,
    last_page: Option<PageMeta>,

    preferences: Option<PreferenceBinding>,
    renderer: Box<dyn ViewRenderer>,
    signals: ListSignals,
}

impl ListController {
    /// Creates a controller with default configuration and renders once.
    ///
    /// Fails with [`GridError::DuplicateId`] if two records share an id and
    /// with [`GridError::InvalidArgument`] if an id is blank.
    pub fn new(records: Vec<Record>, renderer: impl ViewRenderer + 'static) -> Result<Self> {
        Self::with_config(records, ListViewConfig::default(), renderer)
    }

    /// Creates a controller with the given configuration and renders once.
    pub fn with_config(
        records: Vec<Record>,
        config: ListViewConfig,
        renderer: impl ViewRenderer + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let store = DataStore::with_records(records)?;
        let paginator = Paginator::new(config.page_size)?;

        let mut controller = Self {
            store,
            filters: FilterEngine::new(),
            sort: config.default_sort.clone(),
            paginator,
            selection: SelectionTracker::with_mode(config.selection_mode),
            config,
            view: Vec::new(),
            view_revision: None,
            last_page: None,
            preferences: None,
            renderer: Box::new(renderer),
            signals: ListSignals::new(),
        };
        controller.commit("init");
        Ok(controller)
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Replaces the record set.
    ///
    /// Filters are cleared, the page returns to 1 and the selection is
    /// emptied. The sort is kept.
    pub fn load(&mut self, records: Vec<Record>) -> Result<()> {
        self.store.load(records)?;
        let had_filters = !self.filters.specs().is_empty();
        self.filters.clear_all();
        self.paginator.first_page();
        self.selection.clear();
        self.invalidate();

        self.signals.records_changed.emit(RecordsChange::Loaded {
            count: self.store.len(),
        });
        if had_filters {
            self.signals.filters_changed.emit(Vec::new());
        }
        self.commit("load");
        Ok(())
    }

    /// Replaces the record set keeping filters, sort and page.
    ///
    /// Selected ids that are no longer present are dropped; the page is
    /// clamped if the filtered set shrank.
    pub fn refresh(&mut self, records: Vec<Record>) -> Result<()> {
        self.store.load(records)?;
        self.selection.retain(|id| self.store.contains(id.as_str()));
        self.invalidate();

        self.signals.records_changed.emit(RecordsChange::Refreshed {
            count: self.store.len(),
        });
        self.commit("refresh");
        Ok(())
    }

    /// Appends a record.
    pub fn add(&mut self, record: Record) -> Result<()> {
        let id = record.id().clone();
        self.store.add(record)?;
        self.invalidate();
        self.signals.records_changed.emit(RecordsChange::Added(id));
        self.commit("add");
        Ok(())
    }

    /// Removes a record, dropping it from the selection too.
    pub fn remove(&mut self, id: &str) -> Result<Record> {
        let record = self.store.remove(id)?;
        self.selection.remove(id);
        self.invalidate();
        self.signals
            .records_changed
            .emit(RecordsChange::Removed(vec![record.id().clone()]));
        self.commit("remove");
        Ok(record)
    }

    /// Applies a patch to a record.
    pub fn update(&mut self, id: &str, patch: &RecordPatch) -> Result<()> {
        let updated = self.store.update(id, patch)?.id().clone();
        self.invalidate();
        self.signals
            .records_changed
            .emit(RecordsChange::Updated(updated));
        self.commit("update");
        Ok(())
    }

    /// Removes every selected record and clears the selection.
    pub fn remove_selected(&mut self) -> Result<Vec<Record>> {
        let ids = self.selection.ids().to_vec();
        let removed = self.store.remove_many(&ids)?;
        self.selection.clear();
        self.invalidate();
        if !removed.is_empty() {
            self.signals
                .records_changed
                .emit(RecordsChange::Removed(ids));
        }
        self.commit("remove_selected");
        Ok(removed)
    }

    // =========================================================================
    // Filters and sort
    // =========================================================================

    /// Registers or replaces the filter for `kind` and returns to page 1.
    pub fn set_filter(&mut self, kind: impl Into<String>, spec: FilterSpec) -> Result<()> {
        self.filters.set_filter(kind, spec)?;
        self.filters_updated("set_filter");
        Ok(())
    }

    /// Sets the free-text search using the configured kind and fields.
    pub fn set_search(&mut self, query: impl Into<String>) -> Result<()> {
        let spec = FilterSpec::text(self.config.search_fields.iter().cloned(), query);
        let kind = self.config.search_kind.clone();
        self.set_filter(kind, spec)
    }

    /// Removes the filter for `kind`. Returns whether one was set.
    pub fn clear_filter(&mut self, kind: &str) -> bool {
        let removed = self.filters.clear_filter(kind);
        if removed {
            self.filters_updated("clear_filter");
        } else {
            self.commit("clear_filter");
        }
        removed
    }

    /// Removes every filter and returns to page 1.
    pub fn clear_filters(&mut self) {
        self.filters.clear_all();
        self.filters_updated("clear_filters");
    }

    /// Replaces all filters at once.
    ///
    /// Every spec is validated before any is applied.
    pub fn replace_filters(&mut self, specs: BTreeMap<String, FilterSpec>) -> Result<()> {
        let mut filters = FilterEngine::new();
        for (kind, spec) in specs {
            filters.set_filter(kind, spec)?;
        }
        self.filters = filters;
        self.filters_updated("replace_filters");
        Ok(())
    }

    /// Re-applies a filter set from history.
    pub fn apply_history(&mut self, entry: &HistoryEntry) -> Result<()> {
        self.replace_filters(entry.filters.clone())
    }

    /// Sorts the view and returns to page 1.
    pub fn set_sort(&mut self, spec: SortSpec) -> Result<()> {
        spec.validate()?;
        tracing::debug!(target: "horizon_grid::controller", sort = %spec, "sort set");
        self.sort = Some(spec);
        self.invalidate();
        self.paginator.first_page();
        self.commit("set_sort");
        Ok(())
    }

    /// Restores store order and returns to page 1.
    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.invalidate();
        self.paginator.first_page();
        self.commit("clear_sort");
    }

    // =========================================================================
    // Paging
    // =========================================================================

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.paginator.set_page_size(page_size)?;
        self.commit("set_page_size");
        Ok(())
    }

    /// Moves to page `n`, clamped to the available pages.
    pub fn go_to_page(&mut self, n: usize) {
        self.paginator.go_to_page(n, self.view.len());
        self.commit("go_to_page");
    }

    pub fn next_page(&mut self) {
        self.paginator.next_page(self.view.len());
        self.commit("next_page");
    }

    pub fn previous_page(&mut self) {
        self.paginator.previous_page(self.view.len());
        self.commit("previous_page");
    }

    pub fn first_page(&mut self) {
        self.paginator.first_page();
        self.commit("first_page");
    }

    pub fn last_page(&mut self) {
        self.paginator.last_page(self.view.len());
        self.commit("last_page");
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Flips a record's checkbox. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let id = self
            .store
            .get(id)
            .ok_or_else(|| GridError::not_found(id))?
            .id()
            .clone();
        let selected = self.selection.toggle(&id);
        self.commit("toggle");
        Ok(selected)
    }

    /// Selects every record on the current page.
    pub fn select_page(&mut self) {
        let visible = self.visible_ids();
        self.selection.select_all(&visible);
        self.commit("select_page");
    }

    /// Deselects every record on the current page; other pages keep theirs.
    pub fn deselect_page(&mut self) {
        let visible = self.visible_ids();
        self.selection.deselect_all(&visible);
        self.commit("deselect_page");
    }

    /// Handles the page's "select all" checkbox.
    pub fn toggle_page(&mut self, checked: bool) {
        if checked {
            self.select_page();
        } else {
            self.deselect_page();
        }
    }

    /// Deselects everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.commit("clear_selection");
    }

    /// The selection tracker.
    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Tri-state of the current page's "select all" checkbox.
    pub fn selection_state(&self) -> SelectionState {
        self.selection.state(&self.visible_ids())
    }

    /// Selected records in selection order.
    pub fn selected_records(&self) -> Vec<&Record> {
        self.selection
            .ids()
            .iter()
            .filter_map(|id| self.store.get(id.as_str()))
            .collect()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Filtered, sorted records across all pages.
    pub fn filtered(&self) -> Vec<&Record> {
        let records = self.store.records();
        self.view.iter().map(|&i| &records[i]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.view.len()
    }

    /// Records on the current page.
    pub fn visible(&self) -> Vec<&Record> {
        let records = self.store.records();
        self.paginator
            .get_page(&self.view)
            .iter()
            .map(|&i| &records[i])
            .collect()
    }

    /// Ids of the records on the current page.
    pub fn visible_ids(&self) -> Vec<RecordId> {
        self.visible().into_iter().map(|r| r.id().clone()).collect()
    }

    pub fn page_meta(&self) -> PageMeta {
        self.paginator.meta(self.view.len())
    }

    /// Statistics over the filtered records.
    pub fn summary(&self) -> Summary<'_> {
        Summary::new(self.filtered())
    }

    /// Distinct values of a field over the whole record set, for quick
    /// filter chips.
    pub fn distinct_values(&self, field: &str) -> Vec<FieldValue> {
        Summary::new(self.store.records()).distinct(field)
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn filters(&self) -> &FilterEngine {
        &self.filters
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn config(&self) -> &ListViewConfig {
        &self.config
    }

    pub fn signals(&self) -> &ListSignals {
        &self.signals
    }

    /// The selection tracker's change signal. Args: (selected, deselected)
    pub fn selection_changed(&self) -> &Signal<(Vec<RecordId>, Vec<RecordId>)> {
        &self.selection.selection_changed
    }

    /// Builds the snapshot for the current state without rendering it.
    pub fn snapshot(&self) -> ViewSnapshot {
        let rows: Vec<ViewRow> = self
            .visible()
            .into_iter()
            .map(|record| ViewRow {
                selected: self.selection.is_selected(record.id().as_str()),
                record: record.clone(),
            })
            .collect();
        let selection_state = self.selection_state();

        ViewSnapshot {
            rows,
            selection_state,
            selected_count: self.selection.len(),
            page: self.page_meta(),
            total_records: self.store.len(),
            sort: self.sort.clone(),
            active_filters: self.filters.active_kinds(),
        }
    }

    /// Writes the filtered, sorted view (all pages) as CSV.
    ///
    /// An empty `columns` list exports every field.
    pub fn export_filtered_csv<W, S>(&self, writer: W, columns: &[S]) -> Result<()>
    where
        W: Write,
        S: AsRef<str>,
    {
        export_csv(writer, self.filtered(), columns)
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    /// Connects a preference store; the view's blob lives under
    /// `"<view_key>.preferences"`.
    pub fn attach_preferences(&mut self, store: Arc<dyn KeyValueStore>, view_key: impl Into<String>) {
        self.preferences = Some(PreferenceBinding {
            store,
            view_key: view_key.into(),
        });
    }

    /// Saves page size, sort and filters.
    pub fn save_preferences(&self) -> Result<()> {
        let binding = self.preference_binding()?;
        let prefs = ViewPreferences {
            page_size: self.paginator.page_size(),
            sort: self.sort.clone(),
            filters: self.filters.specs().clone(),
        };
        let key = ViewPreferences::key(&binding.view_key);
        binding.store.set(&key, serde_json::to_value(&prefs)?)?;
        tracing::debug!(target: "horizon_grid::preferences", key = %key, "preferences saved");
        Ok(())
    }

    /// Applies saved preferences. Returns whether anything was applied.
    ///
    /// A missing blob is not an error. A blob that does not parse or
    /// validate is logged and ignored.
    pub fn restore_preferences(&mut self) -> Result<bool> {
        let binding = self.preference_binding()?;
        let key = ViewPreferences::key(&binding.view_key);
        let Some(value) = binding.store.get(&key)? else {
            return Ok(false);
        };

        let prefs: ViewPreferences = match serde_json::from_value(value) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(target: "horizon_grid::preferences", key = %key, error = %e, "ignoring malformed preferences");
                return Ok(false);
            }
        };
        if let Err(e) = prefs.validate() {
            tracing::warn!(target: "horizon_grid::preferences", key = %key, error = %e, "ignoring invalid preferences");
            return Ok(false);
        }

        let mut filters = FilterEngine::new();
        for (kind, spec) in prefs.filters {
            filters.set_filter(kind, spec)?;
        }
        self.paginator.set_page_size(prefs.page_size)?;
        self.sort = prefs.sort;
        self.filters = filters;
        self.invalidate();
        tracing::debug!(target: "horizon_grid::preferences", key = %key, "preferences restored");
        self.signals
            .filters_changed
            .emit(self.filters.active_kinds());
        self.commit("restore_preferences");
        Ok(true)
    }

    /// Loads this view's filter history from the attached preference store,
    /// under `"<view_key>.history"` and capped at
    /// [`history_limit`](ListViewConfig::history_limit).
    pub fn filter_history(&self) -> Result<FilterHistory> {
        let binding = self.preference_binding()?;
        FilterHistory::for_view(binding.store.clone(), &binding.view_key, &self.config)
    }

    fn preference_binding(&self) -> Result<&PreferenceBinding> {
        self.preferences
            .as_ref()
            .ok_or_else(|| GridError::invalid_argument("no preference store attached"))
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    fn invalidate(&mut self) {
        self.view_revision = None;
    }

    fn filters_updated(&mut self, reason: &'static str) {
        self.invalidate();
        self.paginator.first_page();
        self.signals
            .filters_changed
            .emit(self.filters.active_kinds());
        self.commit(reason);
    }

    /// Recomputes the filtered, sorted view if the store or the filter/sort
    /// inputs changed since the last run.
    fn refilter(&mut self) {
        let revision = self.store.revision();
        if self.view_revision == Some(revision) {
            return;
        }
        let _perf = PerfSpan::new("refilter");

        let records = self.store.records();
        let mut view: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.filters.matches(record))
            .map(|(i, _)| i)
            .collect();
        if let Some(sort) = &self.sort {
            view.sort_by(|&a, &b| sort.compare(&records[a], &records[b]));
        }

        tracing::debug!(
            target: "horizon_grid::filter",
            total = records.len(),
            filtered = view.len(),
            "view recomputed"
        );
        self.view = view;
        self.view_revision = Some(revision);
    }

    /// Filtering, sorting and paging, then one render.
    #[tracing::instrument(skip(self), target = "horizon_grid::controller", level = "debug", name = "horizon_grid::pipeline")]
    fn commit(&mut self, reason: &'static str) {
        self.refilter();

        let total = self.view.len();
        if self.paginator.clamp(total) {
            tracing::debug!(target: "horizon_grid::controller", page = self.paginator.page(), "page clamped");
        }
        let meta = self.paginator.meta(total);
        if self.last_page != Some(meta) {
            self.last_page = Some(meta);
            self.signals.page_changed.emit(meta);
        }

        let snapshot = self.snapshot();
        tracing::debug!(
            target: "horizon_grid::controller",
            reason,
            filtered = total,
            page = meta.page,
            rows = snapshot.rows.len(),
            selected = snapshot.selected_count,
            "rendering"
        );
        self.renderer.render(&snapshot);
    }
}

impl std::fmt::Debug for ListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("records", &self.store.len())
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("paginator", &self.paginator)
            .field("selection", &self.selection)
            .field("filtered", &self.view.len())
            .finish_non_exhaustive()
    }
}
