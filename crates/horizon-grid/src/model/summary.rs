//! Aggregate statistics for dashboard stat cards.
//!
//! [`Summary`] borrows a slice of records (usually the filtered view) and
//! answers the questions a stat card asks: how many, how many of each kind,
//! and totals of numeric fields.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::record::Record;
use super::value::FieldValue;

/// Read-only aggregate view over a set of records.
#[derive(Debug, Clone)]
pub struct Summary<'a> {
    records: Vec<&'a Record>,
}

impl<'a> Summary<'a> {
    /// Creates a summary over the given records.
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Number of records.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Number of records whose field equals `value`.
    pub fn count_where(&self, field: &str, value: &FieldValue) -> usize {
        self.records
            .iter()
            .filter(|r| r.value(field).loose_eq(value))
            .count()
    }

    /// Record count per distinct text value of a field.
    ///
    /// Missing fields count under the empty string.
    pub fn count_by(&self, field: &str) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts
                .entry(record.value(field).text().into_owned())
                .or_insert(0) += 1;
        }
        counts
    }

    /// Sum of a numeric field. Non-numeric and missing values are skipped.
    pub fn sum(&self, field: &str) -> f64 {
        self.records
            .iter()
            .filter_map(|r| r.value(field).as_float())
            .sum()
    }

    /// Distinct non-null values of a field, in sort order.
    ///
    /// Values that sort as equal collapse into the first one seen, so
    /// `3` and `3.0` appear once and all NaNs appear once.
    pub fn distinct(&self, field: &str) -> Vec<FieldValue> {
        let mut values: Vec<FieldValue> = Vec::new();
        for record in &self.records {
            let value = record.value(field);
            if !value.is_null() && !values.iter().any(|v| v.sort_cmp(value) == Ordering::Equal) {
                values.push(value.clone());
            }
        }
        values.sort_by(|a, b| a.sort_cmp(b));
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services() -> Vec<Record> {
        vec![
            Record::new("S1").with("status", "Completed").with("cost", 120),
            Record::new("S2").with("status", "Scheduled").with("cost", 80.5),
            Record::new("S3").with("status", "Completed").with("cost", "n/a"),
            Record::new("S4").with("status", "Cancelled"),
        ]
    }

    #[test]
    fn test_counts() {
        let records = services();
        let summary = Summary::new(&records);

        assert_eq!(summary.count(), 4);
        assert_eq!(summary.count_where("status", &FieldValue::from("Completed")), 2);

        let by_status = summary.count_by("status");
        assert_eq!(
            by_status.into_iter().collect::<Vec<_>>(),
            vec![
                ("Cancelled".to_string(), 1),
                ("Completed".to_string(), 2),
                ("Scheduled".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_sum_skips_non_numeric() {
        let records = services();
        let summary = Summary::new(&records);
        assert_eq!(summary.sum("cost"), 200.5);
        assert_eq!(summary.sum("missing"), 0.0);
    }

    #[test]
    fn test_distinct_sorted_without_nulls() {
        let records = services();
        let statuses = Summary::new(&records).distinct("status");
        assert_eq!(
            statuses,
            vec![
                FieldValue::from("Cancelled"),
                FieldValue::from("Completed"),
                FieldValue::from("Scheduled"),
            ]
        );
        assert!(Summary::new(&Vec::<Record>::new()).distinct("status").is_empty());
    }

    #[test]
    fn test_distinct_with_nan_costs() {
        let records = vec![
            Record::new("S1").with("cost", f64::NAN),
            Record::new("S2").with("cost", 40),
            Record::new("S3").with("cost", f64::NAN),
            Record::new("S4").with("cost", 40.0),
            Record::new("S5").with("cost", 12.5),
        ];
        let costs = Summary::new(&records).distinct("cost");

        assert_eq!(costs.len(), 3);
        assert_eq!(costs[0], FieldValue::Float(12.5));
        assert_eq!(costs[1], FieldValue::Int(40));
        assert!(costs[2].as_float().is_some_and(f64::is_nan));
    }
}
