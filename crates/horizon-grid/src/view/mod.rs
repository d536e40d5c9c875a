//! List-view control and rendering.
//!
//! - [`ListController`]: drives the filter, sort and paging pipeline for one
//!   list view and renders after every change
//! - [`ViewRenderer`]: the port a UI implements to draw snapshots
//! - [`SnapshotLog`]: a renderer that records snapshots, handy in tests
//!
//! State machine per user event:
//!
//! ```text
//! Idle ──> Filtering ──> Sorting ──> Paginating ──> Rendered ──> Idle
//! ```

mod controller;
mod renderer;

pub use controller::{ListController, ListSignals, RecordsChange};
pub use renderer::{SnapshotLog, ViewRenderer, ViewRow, ViewSnapshot};
