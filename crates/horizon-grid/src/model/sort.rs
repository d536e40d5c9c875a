//! Column sorting for list views.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::Record;
use crate::error::{GridError, Result};

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first; nulls first.
    #[default]
    Ascending,
    /// Largest first; nulls last.
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Sort order for a list view: one field and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on a field.
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending sort on a field.
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Rejects an empty field name.
    pub fn validate(&self) -> Result<()> {
        if self.field.trim().is_empty() {
            return Err(GridError::invalid_argument("sort field name is empty"));
        }
        Ok(())
    }

    /// Compares two records under this sort.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let ordering = a.value(&self.field).sort_cmp(b.value(&self.field));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Sorts records in place. Equal keys keep their relative order.
    pub fn apply(&self, records: &mut [&Record]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        write!(f, "{} {arrow}", self.field)
    }
}
