//! Records: one row of domain data.
//!
//! A [`Record`] is an opaque mapping of field names to [`FieldValue`]s with a
//! unique string `id` field. The list controller never interprets fields
//! beyond what filters, sorting and summaries ask of them.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::FieldValue;
use crate::error::{GridError, Result};

/// Name of the identifying field every record carries.
pub const ID_FIELD: &str = "id";

static NULL: FieldValue = FieldValue::Null;

/// Unique identifier of a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a record id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for RecordId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl From<&RecordId> for RecordId {
    fn from(v: &RecordId) -> Self {
        v.clone()
    }
}

/// One row of data, identified by its `id` field.
///
/// # Example
///
/// ```
/// use horizon_grid::model::Record;
///
/// let party = Record::new("P001")
///     .with("name", "Acme Corporation")
///     .with("partyType", "Customer")
///     .with("isActive", true);
///
/// assert_eq!(party.id().as_str(), "P001");
/// assert_eq!(party.value("name").as_str(), Some("Acme Corporation"));
/// assert!(party.value("missing").is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, FieldValue>",
    into = "BTreeMap<String, FieldValue>"
)]
pub struct Record {
    id: RecordId,
    /// All fields, including `id` as a string value.
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates a record with only its id field set.
    ///
    /// The id is not checked here; a [`DataStore`](super::DataStore) rejects
    /// empty or blank ids just as [`from_fields`](Self::from_fields) does.
    pub fn new(id: impl Into<RecordId>) -> Self {
        let id = id.into();
        let mut fields = BTreeMap::new();
        fields.insert(ID_FIELD.to_string(), FieldValue::String(id.0.clone()));
        Self { id, fields }
    }

    /// Builds a record from a field map.
    ///
    /// The map must contain an `id` field holding a non-empty string or an
    /// integer; integer ids are stored as their decimal string.
    pub fn from_fields(mut fields: BTreeMap<String, FieldValue>) -> Result<Self> {
        let id = match fields.get(ID_FIELD) {
            Some(FieldValue::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(FieldValue::Int(n)) => n.to_string(),
            // Date-shaped string ids deserialize as dates.
            Some(FieldValue::Date(d)) => d.format("%Y-%m-%d").to_string(),
            Some(other) => {
                return Err(GridError::invalid_argument(format!(
                    "record id must be a non-empty string or integer, got {other:?}"
                )));
            }
            None => return Err(GridError::invalid_argument("record has no 'id' field")),
        };
        fields.insert(ID_FIELD.to_string(), FieldValue::String(id.clone()));
        Ok(Self {
            id: RecordId(id),
            fields,
        })
    }

    /// Sets a field, builder style.
    ///
    /// The `id` field is fixed at construction; setting it here is ignored.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let field = field.into();
        if field != ID_FIELD {
            self.fields.insert(field, value.into());
        }
        self
    }

    /// Returns the record's id.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Returns the value of a field, or [`FieldValue::Null`] when missing.
    pub fn value(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&NULL)
    }

    /// Iterates over all fields in name order, including `id`.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over all field names in name order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Applies a patch in place.
    ///
    /// A [`FieldValue::Null`] in the patch removes the field. Patches may not
    /// change the id; a patch carrying the same id is accepted.
    pub fn apply(&mut self, patch: &RecordPatch) -> Result<()> {
        if let Some(value) = patch.fields.get(ID_FIELD) {
            if value.text() != self.id.as_str() {
                return Err(GridError::invalid_argument(format!(
                    "cannot change id of record '{}'",
                    self.id
                )));
            }
        }

        for (field, value) in &patch.fields {
            if field == ID_FIELD {
                continue;
            }
            if value.is_null() {
                self.fields.remove(field);
            } else {
                self.fields.insert(field.clone(), value.clone());
            }
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<String, FieldValue>> for Record {
    type Error = GridError;

    fn try_from(fields: BTreeMap<String, FieldValue>) -> Result<Self> {
        Record::from_fields(fields)
    }
}

impl From<Record> for BTreeMap<String, FieldValue> {
    fn from(record: Record) -> Self {
        record.fields
    }
}

/// A partial update for a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordPatch {
    fields: BTreeMap<String, FieldValue>,
}

impl RecordPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field in the patch, builder style.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the patched fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_a_field() {
        let record = Record::new("P001").with("name", "Acme Corporation");
        assert_eq!(record.value("id").as_str(), Some("P001"));
        assert_eq!(record.field_names().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn test_with_ignores_id() {
        let record = Record::new("P001").with("id", "P999");
        assert_eq!(record.id().as_str(), "P001");
        assert_eq!(record.value("id").as_str(), Some("P001"));
    }

    #[test]
    fn test_apply_patch() {
        let mut record = Record::new("S1")
            .with("status", "Scheduled")
            .with("notes", "call first");

        let patch = RecordPatch::new()
            .set("status", "Completed")
            .set("notes", FieldValue::Null)
            .set("cost", 120.5);
        record.apply(&patch).unwrap();

        assert_eq!(record.value("status").as_str(), Some("Completed"));
        assert!(record.get("notes").is_none());
        assert_eq!(record.value("cost").as_float(), Some(120.5));
    }

    #[test]
    fn test_patch_cannot_change_id() {
        let mut record = Record::new("S1");
        let err = record
            .apply(&RecordPatch::new().set("id", "S2"))
            .unwrap_err();
        assert!(err.is_invalid_argument());

        // Same id is accepted.
        record.apply(&RecordPatch::new().set("id", "S1")).unwrap();
        assert_eq!(record.id().as_str(), "S1");
    }

    #[test]
    fn test_json_round_trip_shape() {
        let json = r#"{"id":"P002","name":"Global Supplies Inc","isActive":true,"since":"2021-06-01"}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id().as_str(), "P002");
        assert_eq!(record.value("isActive").as_bool(), Some(true));
        assert!(record.value("since").as_date().is_some());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "Global Supplies Inc");
        assert_eq!(value["id"], "P002");
    }

    #[test]
    fn test_integer_id_becomes_string() {
        let record: Record = serde_json::from_str(r#"{"id": 17, "name": "x"}"#).unwrap();
        assert_eq!(record.id().as_str(), "17");
        assert_eq!(record.value("id").as_str(), Some("17"));
    }

    #[test]
    fn test_missing_id_rejected() {
        let result: std::result::Result<Record, _> = serde_json::from_str(r#"{"name": "x"}"#);
        assert!(result.is_err());

        let err = Record::from_fields(BTreeMap::new()).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
