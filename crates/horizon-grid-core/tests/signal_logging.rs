//! Integration tests for signal emission under a tracing subscriber.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_grid_core::logging::targets;
use horizon_grid_core::{PerfSpan, Signal};
use tracing_subscriber::EnvFilter;

fn with_subscriber<F: FnOnce()>(f: F) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("{}=trace,horizon_grid=trace", targets::CORE)))
        .with_test_writer()
        .finish();
    tracing::subscriber::with_default(subscriber, f);
}

#[test]
fn emit_is_traced_and_delivered() {
    with_subscriber(|| {
        let signal = Signal::<usize>::new();
        let total = Arc::new(AtomicUsize::new(0));

        let total_clone = total.clone();
        signal.connect(move |n| {
            total_clone.fetch_add(*n, Ordering::SeqCst);
        });

        let _span = PerfSpan::new("emit_is_traced_and_delivered");
        signal.emit(3);
        signal.emit(4);
        assert_eq!(total.load(Ordering::SeqCst), 7);
    });
}

#[test]
fn blocked_signal_skips_slots() {
    with_subscriber(|| {
        let signal = Signal::<()>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = calls.clone();
        signal.connect(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.set_blocked(true);
        signal.emit(());
        signal.set_blocked(false);
        signal.emit(());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    });
}

#[test]
fn slot_can_disconnect_itself_during_emit() {
    let signal = Arc::new(Signal::<u8>::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let own_id = Arc::new(parking_lot::Mutex::new(None));

    let weak = Arc::downgrade(&signal);
    let calls_clone = calls.clone();
    let own_id_clone = own_id.clone();
    let id = signal.connect(move |_| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        if let (Some(signal), Some(id)) = (weak.upgrade(), *own_id_clone.lock()) {
            signal.disconnect(id);
        }
    });
    *own_id.lock() = Some(id);

    signal.emit(1);
    signal.emit(2);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(signal.connection_count(), 0);
}
