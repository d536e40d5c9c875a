//! Horizon Grid - filterable, paginated, selectable list views.
//!
//! A toolkit-independent controller for admin and dashboard tables. It owns
//! a record set, filters it through several concurrently active predicates,
//! optionally sorts it, slices it into pages, tracks a selection across pages
//! and re-renders through a [`view::ViewRenderer`] after every change.
//!
//! # Example
//!
//! ```
//! use horizon_grid::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let parties = vec![
//!         Record::new("P001").with("name", "Acme Corporation").with("partyType", "Customer"),
//!         Record::new("P002").with("name", "Global Supplies Inc").with("partyType", "Vendor"),
//!         Record::new("P003").with("name", "Globex").with("partyType", "Prospect"),
//!     ];
//!
//!     let mut controller = ListController::new(parties, |snapshot: &ViewSnapshot| {
//!         for row in &snapshot.rows {
//!             let mark = if row.selected { "[x]" } else { "[ ]" };
//!             println!("{mark} {}", row.record.value("name"));
//!         }
//!         println!("{}", snapshot.page.range_label());
//!     })?;
//!
//!     controller.set_search("acme")?;
//!     controller.toggle("P001")?;
//!     assert_eq!(controller.selection_state(), SelectionState::All);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod file;
pub mod model;
pub mod prelude;
pub mod view;

pub use config::ListViewConfig;
pub use error::{GridError, Result};
pub use horizon_grid_core::{ConnectionId, PerfSpan, Signal};
