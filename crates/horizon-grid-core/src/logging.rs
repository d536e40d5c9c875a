//! Logging facilities for Horizon Grid.
//!
//! Horizon Grid uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_grid=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```

/// Span names used throughout Horizon Grid for tracing.
pub mod span_names {
    /// Filter/sort/paginate/render pipeline span.
    pub const PIPELINE: &str = "horizon_grid::pipeline";
    /// Signal emission span.
    pub const SIGNAL: &str = "horizon_grid::signal";
    /// Preference persistence span.
    pub const PREFERENCES: &str = "horizon_grid::preferences";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core primitives target.
    pub const CORE: &str = "horizon_grid_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_grid_core::signal";
    /// Performance spans target.
    pub const PERF: &str = "horizon_grid::perf";
    /// Record store target.
    pub const STORE: &str = "horizon_grid::store";
    /// Filter engine target.
    pub const FILTER: &str = "horizon_grid::filter";
    /// Selection tracker target.
    pub const SELECTION: &str = "horizon_grid::selection";
    /// Filter history and CSV export target.
    pub const FILE: &str = "horizon_grid::file";
    /// Controller pipeline target.
    pub const CONTROLLER: &str = "horizon_grid::controller";
    /// Key-value preference stores target.
    pub const PREFERENCES: &str = "horizon_grid::preferences";
}

/// A guard for measuring how long an operation takes.
///
/// The span is entered on creation and exited when the guard is dropped.
///
/// ```ignore
/// let _span = PerfSpan::new("evaluate_filters");
/// // ... work ...
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_grid::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Trace-level event under the core target.
#[macro_export]
macro_rules! grid_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_grid_core", $($arg)*)
    };
}

/// Debug-level event under the core target.
#[macro_export]
macro_rules! grid_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_grid_core", $($arg)*)
    };
}

/// Warn-level event under the core target.
#[macro_export]
macro_rules! grid_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_grid_core", $($arg)*)
    };
}
