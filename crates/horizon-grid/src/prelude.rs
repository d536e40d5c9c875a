//! Prelude module for Horizon Grid.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use horizon_grid::prelude::*;
//! ```
//!
//! This provides access to:
//! - The controller and renderer port (`ListController`, `ViewRenderer`)
//! - Records and filters (`Record`, `FilterSpec`, `SortSpec`)
//! - Selection state (`SelectionState`, `SelectionMode`)
//! - Errors (`GridError`, `Result`)

// ============================================================================
// Controller and Rendering
// ============================================================================

pub use crate::view::{ListController, RecordsChange, ViewRenderer, ViewRow, ViewSnapshot};

// ============================================================================
// Data Model
// ============================================================================

pub use crate::model::{
    FieldValue, FilterSpec, PageMeta, Record, RecordId, RecordPatch, SelectionMode,
    SelectionState, SortDirection, SortSpec,
};

// ============================================================================
// Signal/Slot System
// ============================================================================

pub use horizon_grid_core::{ConnectionId, Signal};

// ============================================================================
// Configuration and Errors
// ============================================================================

pub use crate::config::ListViewConfig;
pub use crate::error::{GridError, Result};
