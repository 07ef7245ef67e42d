//! Query descriptors and their evaluation semantics.
//!
//! A [`Query`] is built by the caller, stays opaque to the typed store, and
//! is interpreted by backend adapters. Evaluation lives here, next to the
//! types, so every adapter shares one set of matching rules: filters match
//! records by reference (which is what makes key-only counting possible),
//! sorting always breaks ties on the record key, and the offset/limit window
//! is computed with the same arithmetic for listing and counting.

use holdall_core::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

use crate::error::StoreError;

/// A single predicate over one top-level field of a record body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// Exact match (e.g. name = "a").
    Eq { field: String, value: Value },
    /// Negated exact match. A missing field counts as not equal.
    Ne { field: String, value: Value },
    /// Case-insensitive substring match, recursing into arrays and objects.
    Contains { field: String, value: String },
    /// Case-insensitive prefix match, recursing into arrays and objects.
    Prefix { field: String, value: String },
    /// Inclusive numeric range; string field values are parsed as numbers.
    Range {
        field: String,
        min: Option<f64>,
        max: Option<f64>,
    },
}

impl Filter {
    /// Creates an exact-match filter.
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a negated exact-match filter.
    #[must_use]
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a substring filter.
    #[must_use]
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a prefix filter.
    #[must_use]
    pub fn prefix(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Prefix {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an inclusive numeric range filter.
    #[must_use]
    pub fn range(field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        Self::Range {
            field: field.into(),
            min,
            max,
        }
    }

    /// The field this filter reads.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Eq { field, .. }
            | Self::Ne { field, .. }
            | Self::Contains { field, .. }
            | Self::Prefix { field, .. }
            | Self::Range { field, .. } => field,
        }
    }

    /// Check if a record matches this filter.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::Eq { field, value } => match_eq(record, field, value),
            Self::Ne { field, value } => !match_eq(record, field, value),
            Self::Contains { field, value } => match_string(record, field, value, |s, v| {
                s.to_lowercase().contains(&v.to_lowercase())
            }),
            Self::Prefix { field, value } => match_string(record, field, value, |s, v| {
                s.to_lowercase().starts_with(&v.to_lowercase())
            }),
            Self::Range { field, min, max } => match_range(record, field, *min, *max),
        }
    }
}

fn match_eq(record: &Record, field: &str, value: &Value) -> bool {
    record.field(field) == Some(value)
}

fn match_string<F>(record: &Record, field: &str, search_term: &str, matcher: F) -> bool
where
    F: Fn(&str, &str) -> bool + Copy,
{
    match record.field(field) {
        Some(field_value) => search_value_recursive(field_value, search_term, matcher),
        None => false,
    }
}

/// Recursively search through JSON values (arrays and objects) for string matches.
fn search_value_recursive<F>(value: &Value, search_term: &str, matcher: F) -> bool
where
    F: Fn(&str, &str) -> bool + Copy,
{
    match value {
        Value::String(s) => matcher(s, search_term),
        Value::Array(arr) => arr
            .iter()
            .any(|v| search_value_recursive(v, search_term, matcher)),
        Value::Object(obj) => obj
            .values()
            .any(|v| search_value_recursive(v, search_term, matcher)),
        _ => false,
    }
}

fn match_range(record: &Record, field: &str, min: Option<f64>, max: Option<f64>) -> bool {
    let Some(field_value) = record.field(field) else {
        return false;
    };

    let number = match field_value {
        Value::Number(n) => match n.as_f64() {
            Some(n) => n,
            None => return false,
        },
        Value::String(s) => match s.parse::<f64>() {
            Ok(n) => n,
            Err(_) => return false,
        },
        _ => return false,
    };

    if let Some(min) = min
        && number < min
    {
        return false;
    }

    if let Some(max) = max
        && number > max
    {
        return false;
    }

    true
}

/// One sort key over a top-level field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

impl Sort {
    /// Creates an ascending sort on the given field.
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    /// Creates a descending sort on the given field.
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// Caller-owned filter/order/window descriptor.
///
/// An empty query matches every record of the extent it is evaluated
/// against. Filters compose with AND semantics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub sort: Vec<Sort>,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Query {
    /// Creates an empty query matching the whole extent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter; all filters must match.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Adds a sort key; keys apply in insertion order.
    #[must_use]
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort.push(sort);
        self
    }

    /// Skips the first `offset` matches.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Caps the result window at `limit` matches.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check that every filter and sort key names a non-empty field.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::QueryEvaluation` for the first malformed
    /// descriptor found.
    pub fn validate(&self) -> Result<(), StoreError> {
        for filter in &self.filters {
            if filter.field().is_empty() {
                return Err(StoreError::query_evaluation(
                    "filter names an empty field",
                ));
            }
        }
        for sort in &self.sort {
            if sort.field.is_empty() {
                return Err(StoreError::query_evaluation(
                    "sort key names an empty field",
                ));
            }
        }
        Ok(())
    }

    /// Check if a record matches all filters in this query.
    ///
    /// Evaluates by reference, so adapters can count matches without cloning
    /// record bodies.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|filter| filter.matches(record))
    }

    /// Order records by the query's sort keys.
    ///
    /// Ties, and the whole extent when no sort key is given, fall back to
    /// ascending key order, so one input always produces one output order.
    pub fn sort_records(&self, records: &mut [Record]) {
        records.sort_by(|a, b| self.compare(a, b));
    }

    /// Number of records inside the offset/limit window when `matched`
    /// records match the filters.
    ///
    /// Counting goes through this so a count and the length of the
    /// corresponding listing can never disagree.
    #[must_use]
    pub fn window_len(&self, matched: usize) -> usize {
        let after_offset = matched.saturating_sub(self.offset);
        match self.limit {
            Some(limit) => after_offset.min(limit),
            None => after_offset,
        }
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for sort in &self.sort {
            let ordering = compare_fields(a.field(&sort.field), b.field(&sort.field));
            let ordering = if sort.descending {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.key.cmp(&b.key)
    }
}

/// Compare two optional field values; a missing field sorts before any
/// present one, mixed scalar types compare by display form.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Number(a), Value::Number(b)) => {
                match (a.as_f64(), b.as_f64()) {
                    (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                }
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            _ => a.to_string().cmp(&b.to_string()),
        },
    }
}
