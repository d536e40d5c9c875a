//! Primitive field values stored in records.
//!
//! A [`FieldValue`] is what a record field holds: a string, number, boolean,
//! date, or nothing. Filters, sorting, summaries and CSV export all work in
//! terms of these values.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A primitive value held by a record field.
///
/// Values serialize untagged, so a record round-trips as a flat JSON object.
/// Strings in `YYYY-MM-DD` form deserialize as [`FieldValue::Date`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value.
    #[default]
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating point number.
    Float(f64),
    /// A calendar date.
    Date(NaiveDate),
    /// A string value.
    String(String),
}

impl FieldValue {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as a float.
    /// Also converts integers to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns this value as a date, if it is one.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns true for values that can bound a range: numbers and dates.
    pub fn is_orderable(&self) -> bool {
        matches!(
            self,
            FieldValue::Int(_) | FieldValue::Float(_) | FieldValue::Date(_)
        )
    }

    /// Returns the text form used for searching and export.
    ///
    /// Null renders as an empty string, dates as `YYYY-MM-DD`.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Null => Cow::Borrowed(""),
            FieldValue::String(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Case-insensitive substring test against an already lowercased needle.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        if self.is_null() {
            return false;
        }
        self.text().to_lowercase().contains(needle)
    }

    /// Equality that treats integers and floats as one numeric kind.
    ///
    /// Strings compare exactly, matching how enumerated filter values are
    /// produced from the data itself.
    pub fn loose_eq(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Float(b)) | (FieldValue::Float(b), FieldValue::Int(a)) => {
                cmp_int_float(*a, *b) == Some(Ordering::Equal)
            }
            _ => self == other,
        }
    }

    /// Compares two values of the same orderable kind.
    ///
    /// Integers and floats compare by exact numeric value, without rounding
    /// large integers through `f64`. Returns `None` for values of different
    /// kinds or for NaN.
    pub fn partial_compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => Some(a.cmp(b)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(b),
            (FieldValue::Int(a), FieldValue::Float(b)) => cmp_int_float(*a, *b),
            (FieldValue::Float(a), FieldValue::Int(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
            (FieldValue::Date(a), FieldValue::Date(b)) => Some(a.cmp(b)),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used for sorting rows.
    ///
    /// Kinds order as Null < Bool < numbers < NaN < Date < String. Numbers
    /// compare by value, so `Int(3)` and `Float(3.0)` are equal and `-0.0`
    /// equals `0.0`. Every NaN is equal to every other NaN. Strings compare
    /// case-insensitively first, then exactly, so the order is deterministic.
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        let rank = self.kind_rank().cmp(&other.kind_rank());
        if rank != Ordering::Equal {
            return rank;
        }

        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            // Equal ranks with no partial order can only be two NaNs.
            (a, b) => a.partial_compare(b).unwrap_or(Ordering::Equal),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Bool(_) => 1,
            FieldValue::Float(v) if v.is_nan() => 3,
            FieldValue::Int(_) | FieldValue::Float(_) => 2,
            FieldValue::Date(_) => 4,
            FieldValue::String(_) => 5,
        }
    }
}

/// Compares an integer with a float by exact value.
///
/// Returns `None` when the float is NaN.
fn cmp_int_float(int: i64, float: f64) -> Option<Ordering> {
    // 2^63 is exactly representable; every float in [-2^63, 2^63) truncates
    // to a value that fits in i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return None;
    }
    if float >= LIMIT {
        return Some(Ordering::Less);
    }
    if float < -LIMIT {
        return Some(Ordering::Greater);
    }

    let whole = float.trunc();
    let ordering = int.cmp(&(whole as i64)).then_with(|| {
        if float > whole {
            Ordering::Less
        } else if float < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });
    Some(ordering)
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.pad(""),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            FieldValue::String(v) => f.pad(v),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self {
        FieldValue::Date(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> FieldValue {
        FieldValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_text_forms() {
        assert_eq!(FieldValue::Null.text(), "");
        assert_eq!(FieldValue::from("Acme").text(), "Acme");
        assert_eq!(FieldValue::from(42).text(), "42");
        assert_eq!(FieldValue::from(2.5).text(), "2.5");
        assert_eq!(FieldValue::from(true).text(), "true");
        assert_eq!(date(2024, 3, 7).text(), "2024-03-07");
    }

    #[test]
    fn test_contains_lowercase() {
        let name = FieldValue::from("Acme Corporation");
        assert!(name.contains_lowercase("acme"));
        assert!(name.contains_lowercase("corp"));
        assert!(!name.contains_lowercase("globex"));
        assert!(!FieldValue::Null.contains_lowercase(""));
        assert!(FieldValue::from(555).contains_lowercase("55"));
    }

    #[test]
    fn test_loose_eq_numeric() {
        assert!(FieldValue::Int(3).loose_eq(&FieldValue::Float(3.0)));
        assert!(FieldValue::Float(3.0).loose_eq(&FieldValue::Int(3)));
        assert!(!FieldValue::from("Vendor").loose_eq(&FieldValue::from("vendor")));
    }

    #[test]
    fn test_partial_compare() {
        assert_eq!(
            FieldValue::Int(2).partial_compare(&FieldValue::Float(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            date(2024, 1, 1).partial_compare(&date(2023, 12, 31)),
            Some(Ordering::Greater)
        );
        assert_eq!(FieldValue::Int(1).partial_compare(&date(2024, 1, 1)), None);
    }

    #[test]
    fn test_sort_cmp_orders_kinds_and_case() {
        let mut values = vec![
            FieldValue::from("beta"),
            FieldValue::Null,
            FieldValue::from("Alpha"),
            FieldValue::Int(5),
            FieldValue::from("alpha"),
            FieldValue::Float(1.5),
        ];
        values.sort_by(|a, b| a.sort_cmp(b));

        assert_eq!(
            values,
            vec![
                FieldValue::Null,
                FieldValue::Float(1.5),
                FieldValue::Int(5),
                FieldValue::from("Alpha"),
                FieldValue::from("alpha"),
                FieldValue::from("beta"),
            ]
        );
    }

    #[test]
    fn test_sort_cmp_ranks_nan_after_numbers() {
        let mut values = vec![
            FieldValue::Float(f64::NAN),
            FieldValue::Float(2.0),
            date(2024, 1, 1),
            FieldValue::Float(f64::NAN),
            FieldValue::Int(-1),
            FieldValue::Float(f64::INFINITY),
            FieldValue::Null,
        ];
        values.sort_by(|a, b| a.sort_cmp(b));

        assert!(values[0].is_null());
        assert_eq!(values[1], FieldValue::Int(-1));
        assert_eq!(values[2], FieldValue::Float(2.0));
        assert_eq!(values[3], FieldValue::Float(f64::INFINITY));
        assert!(values[4].as_float().is_some_and(f64::is_nan));
        assert!(values[5].as_float().is_some_and(f64::is_nan));
        assert_eq!(values[6], date(2024, 1, 1));

        let nan = FieldValue::Float(f64::NAN);
        assert_eq!(nan.sort_cmp(&nan), Ordering::Equal);
        assert_eq!(nan.sort_cmp(&FieldValue::Int(i64::MAX)), Ordering::Greater);
        assert_eq!(FieldValue::Float(-0.0).sort_cmp(&FieldValue::Float(0.0)), Ordering::Equal);
        assert_eq!(FieldValue::Float(-0.0).sort_cmp(&FieldValue::Int(0)), Ordering::Equal);
    }

    #[test]
    fn test_large_ints_compare_exactly_against_floats() {
        // 2^53 + 1 is not representable as f64 and must not collapse onto 2^53.
        let big = FieldValue::Int((1 << 53) + 1);
        let float = FieldValue::Float(9_007_199_254_740_992.0);
        assert_eq!(big.sort_cmp(&float), Ordering::Greater);
        assert_eq!(float.sort_cmp(&big), Ordering::Less);
        assert!(!big.loose_eq(&float));
        assert!(FieldValue::Int(1 << 53).loose_eq(&float));

        assert_eq!(
            FieldValue::Int(i64::MAX).partial_compare(&FieldValue::Float(9.3e18)),
            Some(Ordering::Less)
        );
        assert_eq!(
            FieldValue::Int(i64::MIN).partial_compare(&FieldValue::Float(-9.3e18)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            FieldValue::Int(-3).partial_compare(&FieldValue::Float(-2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(FieldValue::Int(1).partial_compare(&FieldValue::Float(f64::NAN)), None);
    }

    #[test]
    fn test_sort_cmp_is_consistent_on_mixed_numbers() {
        let values = [
            FieldValue::Int(i64::MAX),
            FieldValue::Float(9_223_372_036_854_775_808.0),
            FieldValue::Int((1 << 53) + 1),
            FieldValue::Float(9_007_199_254_740_992.0),
            FieldValue::Int(1 << 53),
            FieldValue::Float(-0.0),
            FieldValue::Int(0),
            FieldValue::Float(0.5),
            FieldValue::Float(f64::NAN),
            FieldValue::Float(f64::NEG_INFINITY),
        ];
        for a in &values {
            assert_eq!(a.sort_cmp(a), Ordering::Equal);
            for b in &values {
                assert_eq!(a.sort_cmp(b), b.sort_cmp(a).reverse());
                for c in &values {
                    if a.sort_cmp(b) != Ordering::Greater && b.sort_cmp(c) != Ordering::Greater {
                        assert_ne!(a.sort_cmp(c), Ordering::Greater, "{a:?} {b:?} {c:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_json_untagged() {
        let values: Vec<FieldValue> =
            serde_json::from_str(r#"[null, true, 7, 1.25, "2024-05-01", "Chicago"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FieldValue::Null,
                FieldValue::Bool(true),
                FieldValue::Int(7),
                FieldValue::Float(1.25),
                date(2024, 5, 1),
                FieldValue::from("Chicago"),
            ]
        );

        let json = serde_json::to_string(&date(2024, 5, 1)).unwrap();
        assert_eq!(json, r#""2024-05-01""#);
    }
}
