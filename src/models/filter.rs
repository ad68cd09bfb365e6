//! Backend-agnostic filter model
//!
//! A [`Filter`] is an ordered list of [`Filtering`] predicates. Each predicate
//! targets a single document field and contributes one clause to the compiled
//! boolean query: `and` (positive equality), `andNot` (negated equality) or
//! `between` (inclusive range).

use crate::search::{SearchError, SearchResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Scalar value carried by a predicate
///
/// Serialized untagged, so JSON booleans, numbers and strings map directly.
/// JSON strings always decode to [`FilterValue::Text`] and are sent to the
/// backend verbatim; date-time ordering is recovered from the text when
/// comparing. [`FilterValue::DateTime`] is only built from Rust values and
/// renders as `%Y-%m-%dT%H:%M:%S%.f`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(serde_json::Number),
    #[serde(skip_deserializing)]
    DateTime(NaiveDateTime),
    Text(String),
}

impl FilterValue {
    /// Numeric view of the value, parsing numeric text
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FilterValue::Number(n) => n.as_f64(),
            FilterValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Exact integer view of the value, parsing integral text
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            FilterValue::Number(n) => n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from)),
            FilterValue::Text(s) => s.trim().parse::<i128>().ok(),
            _ => None,
        }
    }

    /// Date-time view of the value, parsing ISO-8601 text
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            FilterValue::DateTime(dt) => Some(*dt),
            FilterValue::Text(s) => parse_datetime(s),
            _ => None,
        }
    }

    /// Loose ordering used for range validation and in-process evaluation.
    ///
    /// Integers compare exactly, other numbers as `f64`, then date-times
    /// chronologically, then booleans, then plain text lexically. Anything
    /// else is incomparable.
    pub fn compare(&self, other: &FilterValue) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.as_integer(), other.as_integer()) {
            return Some(a.cmp(&b));
        }
        if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
            return a.partial_cmp(&b);
        }
        if let (Some(a), Some(b)) = (self.as_datetime(), other.as_datetime()) {
            return Some(a.cmp(&b));
        }
        match (self, other) {
            (FilterValue::Bool(a), FilterValue::Bool(b)) => Some(a.cmp(b)),
            (FilterValue::Text(a), FilterValue::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Convert a JSON scalar into a filter value. Arrays, objects and null yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<FilterValue> {
        match value {
            serde_json::Value::Bool(b) => Some(FilterValue::Bool(*b)),
            serde_json::Value::Number(n) => Some(FilterValue::Number(n.clone())),
            serde_json::Value::String(s) => Some(FilterValue::Text(s.clone())),
            _ => None,
        }
    }

    /// JSON rendering used by wire protocols
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FilterValue::Bool(b) => serde_json::Value::Bool(*b),
            FilterValue::Number(n) => serde_json::Value::Number(n.clone()),
            FilterValue::DateTime(dt) => serde_json::Value::String(format_datetime(dt)),
            FilterValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::DateTime(dt) => f.write_str(&format_datetime(dt)),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<u64> for FilterValue {
    fn from(value: u64) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<f64> for FilterValue {
    /// Non-finite floats have no JSON form and fall back to text
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(FilterValue::Number)
            .unwrap_or_else(|| FilterValue::Text(value.to_string()))
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(value: NaiveDateTime) -> Self {
        FilterValue::DateTime(value)
    }
}

/// Parse the date-time shapes accepted in filters and documents
pub(crate) fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Equality predicate on one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EqualityFilter {
    pub property_name: String,
    pub property_value: FilterValue,
}

/// Inclusive range predicate on one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFilter {
    pub property_name: String,
    pub left_value: FilterValue,
    pub right_value: FilterValue,
}

/// Discriminator of a [`Filtering`] predicate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum FilterKind {
    And,
    AndNot,
    Between,
}

/// A single predicate unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Filtering {
    /// Field must equal the value
    And(EqualityFilter),
    /// Field must not equal the value
    AndNot(EqualityFilter),
    /// Field must fall within `[leftValue, rightValue]`
    Between(RangeFilter),
}

impl Filtering {
    pub fn and(property_name: impl Into<String>, property_value: impl Into<FilterValue>) -> Self {
        Filtering::And(EqualityFilter {
            property_name: property_name.into(),
            property_value: property_value.into(),
        })
    }

    pub fn and_not(
        property_name: impl Into<String>,
        property_value: impl Into<FilterValue>,
    ) -> Self {
        Filtering::AndNot(EqualityFilter {
            property_name: property_name.into(),
            property_value: property_value.into(),
        })
    }

    pub fn between(
        property_name: impl Into<String>,
        left_value: impl Into<FilterValue>,
        right_value: impl Into<FilterValue>,
    ) -> Self {
        Filtering::Between(RangeFilter {
            property_name: property_name.into(),
            left_value: left_value.into(),
            right_value: right_value.into(),
        })
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Filtering::And(_) => FilterKind::And,
            Filtering::AndNot(_) => FilterKind::AndNot,
            Filtering::Between(_) => FilterKind::Between,
        }
    }

    /// Field targeted by this predicate
    pub fn property_name(&self) -> &str {
        match self {
            Filtering::And(f) | Filtering::AndNot(f) => &f.property_name,
            Filtering::Between(f) => &f.property_name,
        }
    }

    /// Decode one predicate, reporting unknown kinds as
    /// [`SearchError::UnsupportedFilterKind`].
    pub fn from_value(value: serde_json::Value) -> SearchResult<Self> {
        let kind = value
            .get("kind")
            .and_then(|k| k.as_str())
            .ok_or_else(|| SearchError::InvalidFilter("filter is missing a 'kind'".to_string()))?;

        if FilterKind::from_str(kind).is_err() {
            return Err(SearchError::UnsupportedFilterKind {
                kind: kind.to_string(),
            });
        }

        serde_json::from_value(value).map_err(|e| SearchError::InvalidFilter(e.to_string()))
    }
}

/// Ordered collection of predicates; empty means match everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub filters: Vec<Filtering>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filtering: Filtering) {
        self.filters.push(filtering);
    }

    /// Append an equality predicate
    pub fn and(mut self, property_name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.push(Filtering::and(property_name, value));
        self
    }

    /// Append a negated equality predicate
    pub fn and_not(
        mut self,
        property_name: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.filters.push(Filtering::and_not(property_name, value));
        self
    }

    /// Append an inclusive range predicate
    pub fn between(
        mut self,
        property_name: impl Into<String>,
        left: impl Into<FilterValue>,
        right: impl Into<FilterValue>,
    ) -> Self {
        self.filters.push(Filtering::between(property_name, left, right));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filtering> {
        self.filters.iter()
    }

    /// Decode a `{"filters": [...]}` document
    pub fn from_value(value: serde_json::Value) -> SearchResult<Self> {
        let filters = match value {
            serde_json::Value::Object(mut map) => match map.remove("filters") {
                Some(serde_json::Value::Array(items)) => items,
                Some(serde_json::Value::Null) | None => Vec::new(),
                Some(_) => {
                    return Err(SearchError::InvalidFilter(
                        "'filters' must be an array".to_string(),
                    ))
                }
            },
            serde_json::Value::Array(items) => items,
            _ => {
                return Err(SearchError::InvalidFilter(
                    "filter must be an object or an array".to_string(),
                ))
            }
        };

        filters
            .into_iter()
            .map(Filtering::from_value)
            .collect::<SearchResult<Vec<_>>>()
            .map(|filters| Filter { filters })
    }
}

impl FromIterator<Filtering> for Filter {
    fn from_iter<I: IntoIterator<Item = Filtering>>(iter: I) -> Self {
        Filter {
            filters: iter.into_iter().collect(),
        }
    }
}

impl FromStr for Filter {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: serde_json::Value =
            serde_json::from_str(s).map_err(|e| SearchError::InvalidFilter(e.to_string()))?;
        Filter::from_value(value)
    }
}
