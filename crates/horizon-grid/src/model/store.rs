//! The full record set behind a list view.
//!
//! [`DataStore`] keeps records in insertion order with an id index for
//! constant-time lookup. Every mutation bumps a revision counter so cached
//! filtered views know to recompute.

use std::collections::{HashMap, HashSet};

use super::record::{Record, RecordId, RecordPatch};
use crate::error::{GridError, Result};

/// Ordered, id-indexed record storage.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    records: Vec<Record>,
    /// Position of each record in `records`.
    index: HashMap<RecordId, usize>,
    revision: u64,
}

impl DataStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `records`.
    ///
    /// Fails with [`GridError::DuplicateId`] if two records share an id and
    /// with [`GridError::InvalidArgument`] if an id is empty or blank.
    pub fn with_records(records: Vec<Record>) -> Result<Self> {
        let mut store = Self::new();
        store.load(records)?;
        Ok(store)
    }

    /// Replaces the full record set.
    ///
    /// On failure the store is left unchanged.
    pub fn load(&mut self, records: Vec<Record>) -> Result<()> {
        let index = Self::build_index(&records)?;
        self.records = records;
        self.index = index;
        self.bump();
        tracing::debug!(target: "horizon_grid::store", count = self.records.len(), "records loaded");
        Ok(())
    }

    /// Appends a record.
    pub fn add(&mut self, record: Record) -> Result<()> {
        Self::check_id(&record)?;
        if self.index.contains_key(record.id()) {
            return Err(GridError::duplicate_id(record.id().as_str()));
        }
        self.index.insert(record.id().clone(), self.records.len());
        tracing::debug!(target: "horizon_grid::store", id = %record.id(), "record added");
        self.records.push(record);
        self.bump();
        Ok(())
    }

    /// Removes and returns the record with the given id.
    pub fn remove(&mut self, id: &str) -> Result<Record> {
        let position = *self.index.get(id).ok_or_else(|| GridError::not_found(id))?;
        let record = self.records.remove(position);
        self.reindex_from(position);
        self.index.remove(id);
        self.bump();
        tracing::debug!(target: "horizon_grid::store", id, "record removed");
        Ok(record)
    }

    /// Removes every listed record.
    ///
    /// Fails with [`GridError::NotFound`] before mutating anything if any id
    /// is missing. Duplicate ids in the input are removed once.
    pub fn remove_many<'a, I>(&mut self, ids: I) -> Result<Vec<Record>>
    where
        I: IntoIterator<Item = &'a RecordId>,
    {
        let targets: HashSet<&RecordId> = ids.into_iter().collect();
        if let Some(missing) = targets.iter().find(|id| !self.index.contains_key(**id)) {
            return Err(GridError::not_found(missing.as_str()));
        }
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let (removed, kept): (Vec<Record>, Vec<Record>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|record| targets.contains(record.id()));
        self.records = kept;
        self.index.clear();
        self.reindex_from(0);
        self.bump();
        tracing::debug!(target: "horizon_grid::store", count = removed.len(), "records removed");
        Ok(removed)
    }

    /// Applies a patch to the record with the given id.
    pub fn update(&mut self, id: &str, patch: &RecordPatch) -> Result<&Record> {
        let position = *self.index.get(id).ok_or_else(|| GridError::not_found(id))?;
        self.records[position].apply(patch)?;
        self.bump();
        tracing::debug!(target: "horizon_grid::store", id, "record updated");
        Ok(&self.records[position])
    }

    /// Returns the record with the given id.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Returns true if a record with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mutation counter; changes whenever the record set changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn reindex_from(&mut self, start: usize) {
        for (offset, record) in self.records[start..].iter().enumerate() {
            self.index.insert(record.id().clone(), start + offset);
        }
    }

    fn build_index(records: &[Record]) -> Result<HashMap<RecordId, usize>> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            Self::check_id(record)?;
            if index.insert(record.id().clone(), position).is_some() {
                return Err(GridError::duplicate_id(record.id().as_str()));
            }
        }
        Ok(index)
    }

    fn check_id(record: &Record) -> Result<()> {
        if record.id().as_str().trim().is_empty() {
            return Err(GridError::invalid_argument("record id is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parties() -> Vec<Record> {
        ["P001", "P002", "P003", "P004"]
            .into_iter()
            .map(|id| Record::new(id).with("name", format!("Party {id}")))
            .collect()
    }

    fn ids(store: &DataStore) -> Vec<&str> {
        store.records().iter().map(|r| r.id().as_str()).collect()
    }

    #[test]
    fn test_load_and_lookup() {
        let store = DataStore::with_records(parties()).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.get("P003").unwrap().value("name").as_str(), Some("Party P003"));
        assert!(store.get("P999").is_none());
    }

    #[test]
    fn test_load_rejects_duplicates_and_keeps_state() {
        let mut store = DataStore::with_records(parties()).unwrap();
        let revision = store.revision();

        let err = store
            .load(vec![Record::new("A"), Record::new("A")])
            .unwrap_err();
        assert!(matches!(err, GridError::DuplicateId { .. }));
        assert_eq!(store.len(), 4);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_blank_ids_rejected() {
        let mut store = DataStore::with_records(parties()).unwrap();
        let revision = store.revision();

        assert!(store.add(Record::new("")).unwrap_err().is_invalid_argument());
        assert!(store.add(Record::new("  ")).unwrap_err().is_invalid_argument());
        let err = store
            .load(vec![Record::new("P010"), Record::new("\t")])
            .unwrap_err();
        assert!(err.is_invalid_argument());

        assert_eq!(ids(&store), vec!["P001", "P002", "P003", "P004"]);
        assert_eq!(store.revision(), revision);
        assert!(DataStore::with_records(vec![Record::new("")]).is_err());
    }

    #[test]
    fn test_add_remove_keep_index_consistent() {
        let mut store = DataStore::with_records(parties()).unwrap();

        store.add(Record::new("P005")).unwrap();
        assert!(matches!(
            store.add(Record::new("P005")),
            Err(GridError::DuplicateId { .. })
        ));

        let removed = store.remove("P002").unwrap();
        assert_eq!(removed.id().as_str(), "P002");
        assert_eq!(ids(&store), vec!["P001", "P003", "P004", "P005"]);

        // Index still resolves records that shifted.
        assert_eq!(store.get("P005").unwrap().id().as_str(), "P005");
        assert_eq!(store.get("P003").unwrap().id().as_str(), "P003");
    }

    #[test]
    fn test_missing_ids_are_errors() {
        let mut store = DataStore::with_records(parties()).unwrap();
        assert!(store.remove("nope").unwrap_err().is_not_found());
        assert!(store
            .update("nope", &RecordPatch::new().set("name", "x"))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_update_bumps_revision() {
        let mut store = DataStore::with_records(parties()).unwrap();
        let before = store.revision();
        let record = store
            .update("P001", &RecordPatch::new().set("city", "New York"))
            .unwrap();
        assert_eq!(record.value("city").as_str(), Some("New York"));
        assert!(store.revision() > before);
    }

    #[test]
    fn test_remove_many_is_all_or_nothing() {
        let mut store = DataStore::with_records(parties()).unwrap();

        let bad = [RecordId::from("P001"), RecordId::from("missing")];
        assert!(store.remove_many(&bad).unwrap_err().is_not_found());
        assert_eq!(store.len(), 4);

        let good = [RecordId::from("P004"), RecordId::from("P001")];
        let removed = store.remove_many(&good).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(ids(&store), vec!["P002", "P003"]);
        assert_eq!(store.get("P003").unwrap().id().as_str(), "P003");
    }
}
