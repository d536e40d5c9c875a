//! Change notification for list views.
//!
//! A [`Signal<Args>`] is a list of callbacks ("slots") that a controller
//! calls when part of its state changes: the record set, the active filters,
//! the page, or the selection. Widgets connect to the signals they care
//! about and redraw or recount in response.
//!
//! # Delivery
//!
//! Slots run synchronously on the emitting thread, in the order they were
//! connected, before [`Signal::emit`] returns. Emission works on a snapshot
//! of the connected slots, so a slot may connect or disconnect slots on the
//! same signal; the change applies from the next emission.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use horizon_grid_core::Signal;
//!
//! // (selected, deselected) ids, as a selection tracker reports them
//! let selection_changed = Signal::<(Vec<String>, Vec<String>)>::new();
//! let selected_count = Arc::new(AtomicUsize::new(0));
//!
//! let count = selected_count.clone();
//! let badge = selection_changed.connect(move |(selected, deselected)| {
//!     count.fetch_add(selected.len(), Ordering::SeqCst);
//!     count.fetch_sub(deselected.len(), Ordering::SeqCst);
//! });
//!
//! selection_changed.emit((vec!["P001".into(), "P004".into()], Vec::new()));
//! selection_changed.emit((Vec::new(), vec!["P001".into()]));
//! assert_eq!(selected_count.load(Ordering::SeqCst), 1);
//!
//! selection_changed.disconnect(badge);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle to one connected slot, returned by [`Signal::connect`].
    ///
    /// Pass it to [`Signal::disconnect`] to remove that slot. Handles are not
    /// reused after a disconnect.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Callbacks invoked with `Args` each time the signal is emitted.
///
/// Use `()` when there is nothing to report, or a tuple or enum to carry
/// several values, e.g. `(Vec<RecordId>, Vec<RecordId>)` for a selection
/// delta.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    /// While set, `emit` is a no-op.
    blocked: AtomicBool,
}

impl<Args: Clone + Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Clone + Send + 'static> Signal<Args> {
    /// Creates a signal with no slots.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connects a slot and returns its handle.
    ///
    /// ```
    /// use horizon_grid_core::Signal;
    ///
    /// let page_changed = Signal::<usize>::new();
    /// page_changed.connect(|page| println!("now on page {page}"));
    /// page_changed.emit(2);
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Removes one slot. Returns `false` if the handle was already removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Removes every slot.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Suppresses or resumes emission, e.g. around a bulk edit that should
    /// be reported once at the end.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Calls every connected slot with `args`, unless the signal is blocked.
    #[tracing::instrument(skip_all, target = "horizon_grid_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "horizon_grid_core::signal", "blocked, nothing emitted");
            return;
        }

        // Release the lock before calling out so slots can reconnect.
        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: "horizon_grid_core::signal", slots = slots.len(), "emit");

        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<(Vec<String>, Vec<String>)>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, Clone, PartialEq)]
    enum RecordsChange {
        Loaded { count: usize },
        Removed(Vec<String>),
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_selection_delta_reaches_every_slot_in_order() {
        let selection_changed = Signal::<(Vec<String>, Vec<String>)>::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for widget in ["badge", "toolbar"] {
            let log = log.clone();
            selection_changed.connect(move |(selected, deselected)| {
                log.lock()
                    .push(format!("{widget}: +{} -{}", selected.len(), deselected.len()));
            });
        }

        selection_changed.emit((ids(&["P001", "P002"]), Vec::new()));
        selection_changed.emit((Vec::new(), ids(&["P002"])));

        assert_eq!(
            *log.lock(),
            vec!["badge: +2 -0", "toolbar: +2 -0", "badge: +0 -1", "toolbar: +0 -1"]
        );
    }

    #[test]
    fn test_records_change_payload_is_delivered_intact() {
        let records_changed = Signal::<RecordsChange>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        records_changed.connect(move |change| seen_clone.lock().push(change.clone()));

        records_changed.emit(RecordsChange::Loaded { count: 12 });
        records_changed.emit(RecordsChange::Removed(ids(&["R03", "R07"])));

        assert_eq!(
            *seen.lock(),
            vec![
                RecordsChange::Loaded { count: 12 },
                RecordsChange::Removed(ids(&["R03", "R07"])),
            ]
        );
    }

    #[test]
    fn test_disconnected_pager_stops_receiving_pages() {
        let page_changed = Signal::<usize>::new();
        let pages = Arc::new(Mutex::new(Vec::new()));

        let pages_clone = pages.clone();
        let pager = page_changed.connect(move |&page| pages_clone.lock().push(page));

        page_changed.emit(1);
        page_changed.emit(2);
        assert!(page_changed.disconnect(pager));
        assert!(!page_changed.disconnect(pager));
        page_changed.emit(3);

        assert_eq!(*pages.lock(), vec![1, 2]);
        assert_eq!(page_changed.connection_count(), 0);
    }

    #[test]
    fn test_blocked_during_bulk_filter_edit() {
        let filters_changed = Signal::<Vec<String>>::new();
        let emissions = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(Vec::new()));

        let emissions_clone = emissions.clone();
        let last_clone = last.clone();
        filters_changed.connect(move |kinds| {
            emissions_clone.fetch_add(1, Ordering::SeqCst);
            *last_clone.lock() = kinds.clone();
        });

        filters_changed.set_blocked(true);
        assert!(filters_changed.is_blocked());
        filters_changed.emit(ids(&["search"]));
        filters_changed.emit(ids(&["search", "category"]));
        filters_changed.set_blocked(false);
        filters_changed.emit(ids(&["category", "search", "status"]));

        assert_eq!(emissions.load(Ordering::SeqCst), 1);
        assert_eq!(*last.lock(), ids(&["category", "search", "status"]));
    }

    #[test]
    fn test_disconnect_all_on_view_teardown() {
        let page_changed = Signal::<usize>::new();
        let calls = Arc::new(AtomicUsize::new(0));
        for _ in 0..4 {
            let calls = calls.clone();
            page_changed.connect(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(page_changed.connection_count(), 4);

        page_changed.disconnect_all();
        page_changed.emit(1);
        assert_eq!(page_changed.connection_count(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_slot_connected_during_emit_waits_for_next_emit() {
        let page_changed = Arc::new(Signal::<usize>::new());
        let late_calls = Arc::new(AtomicUsize::new(0));
        let connected = Arc::new(AtomicBool::new(false));

        let signal = page_changed.clone();
        let late = late_calls.clone();
        page_changed.connect(move |_| {
            if !connected.swap(true, Ordering::SeqCst) {
                let late = late.clone();
                signal.connect(move |_| {
                    late.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        page_changed.emit(1);
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
        assert_eq!(page_changed.connection_count(), 2);

        page_changed.emit(2);
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }
}
