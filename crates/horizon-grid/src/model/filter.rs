//! Filtering for list views.
//!
//! A [`FilterEngine`] holds one [`FilterSpec`] per named filter kind
//! (`"search"`, `"category"`, `"status"`, ...). Kinds combine with logical
//! AND; the values inside one kind (several ticked categories, say) combine
//! with logical OR.
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::{FilterEngine, FilterSpec, Record};
//!
//! let records = vec![
//!     Record::new("P001").with("name", "Acme Corporation").with("partyType", "Customer"),
//!     Record::new("P002").with("name", "Globex").with("partyType", "Vendor"),
//!     Record::new("P003").with("name", "Initech").with("partyType", "Prospect"),
//! ];
//!
//! let mut filters = FilterEngine::new();
//! filters.set_filter("category", FilterSpec::one_of("partyType", ["Customer", "Vendor"]))?;
//! filters.set_filter("search", FilterSpec::search("glob"))?;
//!
//! let visible = filters.evaluate(&records);
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].id().as_str(), "P002");
//! # Ok::<(), horizon_grid::GridError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::Record;
use super::value::FieldValue;
use crate::error::{GridError, Result};

/// A single predicate over a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterSpec {
    /// Case-insensitive substring match on one or more fields.
    ///
    /// An empty field list searches every field, including `id`. A query that
    /// is empty after trimming does not restrict results.
    Text {
        #[serde(default)]
        fields: Vec<String>,
        query: String,
    },
    /// Set membership on an enumerated field. An empty value list does not
    /// restrict results.
    OneOf {
        field: String,
        values: Vec<FieldValue>,
    },
    /// Boolean equality on a field.
    Bool { field: String, value: bool },
    /// Inclusive numeric or date range; either bound may be omitted.
    Range {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<FieldValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<FieldValue>,
    },
}

impl FilterSpec {
    /// Free-text search across every field.
    pub fn search(query: impl Into<String>) -> Self {
        FilterSpec::Text {
            fields: Vec::new(),
            query: query.into(),
        }
    }

    /// Free-text search restricted to the given fields.
    pub fn text<I, S>(fields: I, query: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterSpec::Text {
            fields: fields.into_iter().map(Into::into).collect(),
            query: query.into(),
        }
    }

    /// Set-membership filter.
    pub fn one_of<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        FilterSpec::OneOf {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Boolean-equality filter.
    pub fn flag(field: impl Into<String>, value: bool) -> Self {
        FilterSpec::Bool {
            field: field.into(),
            value,
        }
    }

    /// Range filter with optional bounds.
    pub fn range(
        field: impl Into<String>,
        min: Option<FieldValue>,
        max: Option<FieldValue>,
    ) -> Self {
        FilterSpec::Range {
            field: field.into(),
            min,
            max,
        }
    }

    /// Checks that the spec is well formed.
    pub fn validate(&self) -> Result<()> {
        match self {
            FilterSpec::Text { fields, .. } => {
                if fields.iter().any(|f| f.trim().is_empty()) {
                    return Err(GridError::invalid_argument("text filter has an empty field name"));
                }
            }
            FilterSpec::OneOf { field, .. } | FilterSpec::Bool { field, .. } => {
                check_field(field)?;
            }
            FilterSpec::Range { field, min, max } => {
                check_field(field)?;
                for bound in [min, max].into_iter().flatten() {
                    if !bound.is_orderable() {
                        return Err(GridError::invalid_argument(format!(
                            "range bound on '{field}' must be a number or date, got {bound:?}"
                        )));
                    }
                }
                match (min, max) {
                    (None, None) => {
                        return Err(GridError::invalid_argument(format!(
                            "range filter on '{field}' has no bounds"
                        )));
                    }
                    (Some(lo), Some(hi)) => match lo.partial_compare(hi) {
                        None => {
                            return Err(GridError::invalid_argument(format!(
                                "range bounds on '{field}' are not comparable"
                            )));
                        }
                        Some(std::cmp::Ordering::Greater) => {
                            return Err(GridError::invalid_argument(format!(
                                "range on '{field}' has min greater than max"
                            )));
                        }
                        _ => {}
                    },
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Returns false when the spec places no restriction on results.
    pub fn is_restrictive(&self) -> bool {
        match self {
            FilterSpec::Text { query, .. } => !query.trim().is_empty(),
            FilterSpec::OneOf { values, .. } => !values.is_empty(),
            FilterSpec::Bool { .. } | FilterSpec::Range { .. } => true,
        }
    }

    /// Tests a record against this spec.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            FilterSpec::Text { fields, query } => {
                let needle = query.trim().to_lowercase();
                if needle.is_empty() {
                    return true;
                }
                if fields.is_empty() {
                    record.fields().any(|(_, v)| v.contains_lowercase(&needle))
                } else {
                    fields
                        .iter()
                        .any(|f| record.value(f).contains_lowercase(&needle))
                }
            }
            FilterSpec::OneOf { field, values } => {
                if values.is_empty() {
                    return true;
                }
                let actual = record.value(field);
                values.iter().any(|v| v.loose_eq(actual))
            }
            FilterSpec::Bool { field, value } => record.value(field).as_bool() == Some(*value),
            FilterSpec::Range { field, min, max } => {
                let actual = record.value(field);
                let above_min = min.as_ref().is_none_or(|lo| {
                    matches!(
                        actual.partial_compare(lo),
                        Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
                    )
                });
                let below_max = max.as_ref().is_none_or(|hi| {
                    matches!(
                        actual.partial_compare(hi),
                        Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
                    )
                });
                above_min && below_max
            }
        }
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpec::Text { fields, query } if fields.is_empty() => {
                write!(f, "\"{}\"", query.trim())
            }
            FilterSpec::Text { fields, query } => {
                write!(f, "{} contains \"{}\"", fields.join("/"), query.trim())
            }
            FilterSpec::OneOf { field, values } => {
                let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{field} in [{}]", values.join(", "))
            }
            FilterSpec::Bool { field, value } => write!(f, "{field} = {value}"),
            FilterSpec::Range { field, min, max } => match (min, max) {
                (Some(lo), Some(hi)) => write!(f, "{lo} <= {field} <= {hi}"),
                (Some(lo), None) => write!(f, "{field} >= {lo}"),
                (None, Some(hi)) => write!(f, "{field} <= {hi}"),
                (None, None) => write!(f, "{field} (any)"),
            },
        }
    }
}

fn check_field(field: &str) -> Result<()> {
    if field.trim().is_empty() {
        return Err(GridError::invalid_argument("filter field name is empty"));
    }
    Ok(())
}

/// Combines the active filter specs of a list view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterEngine {
    specs: BTreeMap<String, FilterSpec>,
}

impl FilterEngine {
    /// Creates an engine with no active filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the predicate for a filter kind.
    pub fn set_filter(&mut self, kind: impl Into<String>, spec: FilterSpec) -> Result<()> {
        let kind = kind.into();
        if kind.trim().is_empty() {
            return Err(GridError::invalid_argument("filter kind is empty"));
        }
        spec.validate()?;
        tracing::debug!(target: "horizon_grid::filter", kind = %kind, spec = %spec, "filter set");
        self.specs.insert(kind, spec);
        Ok(())
    }

    /// Removes the predicate for a filter kind. Returns whether one was set.
    pub fn clear_filter(&mut self, kind: &str) -> bool {
        let removed = self.specs.remove(kind).is_some();
        if removed {
            tracing::debug!(target: "horizon_grid::filter", kind, "filter cleared");
        }
        removed
    }

    /// Removes every predicate.
    pub fn clear_all(&mut self) {
        self.specs.clear();
    }

    /// Returns the spec registered for a kind.
    pub fn get(&self, kind: &str) -> Option<&FilterSpec> {
        self.specs.get(kind)
    }

    /// Returns true if the kind has a spec that restricts results.
    pub fn is_active(&self, kind: &str) -> bool {
        self.specs.get(kind).is_some_and(FilterSpec::is_restrictive)
    }

    /// Names of the kinds that currently restrict results.
    pub fn active_kinds(&self) -> Vec<String> {
        self.specs
            .iter()
            .filter(|(_, spec)| spec.is_restrictive())
            .map(|(kind, _)| kind.clone())
            .collect()
    }

    /// Returns true if no registered spec restricts results.
    pub fn is_empty(&self) -> bool {
        !self.specs.values().any(FilterSpec::is_restrictive)
    }

    /// All registered specs by kind.
    pub fn specs(&self) -> &BTreeMap<String, FilterSpec> {
        &self.specs
    }

    /// Tests a record against every active spec.
    pub fn matches(&self, record: &Record) -> bool {
        self.specs.values().all(|spec| spec.matches(record))
    }

    /// Returns the records that pass every active spec, in input order.
    pub fn evaluate<'a, I>(&self, records: I) -> Vec<&'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }

    /// Short human-readable description of the active filters.
    pub fn describe(&self) -> String {
        let parts: Vec<String> = self
            .specs
            .iter()
            .filter(|(_, spec)| spec.is_restrictive())
            .map(|(kind, spec)| format!("{kind}: {spec}"))
            .collect();
        if parts.is_empty() {
            "All records".to_string()
        } else {
            parts.join("; ")
        }
    }
}
