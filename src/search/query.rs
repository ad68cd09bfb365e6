//! Abstract query tree shared by every executor

use crate::models::FilterValue;
use crate::search::error::{SearchError, SearchResult};
use serde::{Deserialize, Serialize};

/// Field list meaning "every document field"
pub const ALL_FIELDS: &str = "*";

/// A single leaf condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    /// Field equals value
    Equals { field: String, value: FilterValue },

    /// Field lies within `[gte, lte]`
    Range {
        field: String,
        gte: FilterValue,
        lte: FilterValue,
    },
}

impl Clause {
    pub fn field(&self) -> &str {
        match self {
            Clause::Equals { field, .. } | Clause::Range { field, .. } => field,
        }
    }
}

/// Conjunction of positive clauses minus a set of excluded clauses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolQuery {
    pub must: Vec<Clause>,
    pub must_not: Vec<Clause>,
}

impl BoolQuery {
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.must_not.is_empty()
    }
}

/// Free-text query across fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiMatchQuery {
    pub text: String,
    pub fields: Vec<String>,
}

/// Compiled query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    MatchAll,
    Bool(BoolQuery),
    MultiMatch(MultiMatchQuery),
}

impl Query {
    pub fn is_match_all(&self) -> bool {
        matches!(self, Query::MatchAll)
    }

    /// The boolean node, if this query has one
    pub fn as_bool(&self) -> Option<&BoolQuery> {
        match self {
            Query::Bool(b) => Some(b),
            _ => None,
        }
    }
}

/// Page parameters (0-based page number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_size: u32,
    pub page_number: u32,
}

impl PageRequest {
    pub fn new(page_size: u32, page_number: u32) -> SearchResult<Self> {
        if page_size == 0 {
            return Err(SearchError::InvalidQuery(
                "page size must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            page_size,
            page_number,
        })
    }

    /// First page of the given size
    pub fn first(page_size: u32) -> SearchResult<Self> {
        Self::new(page_size, 0)
    }

    /// Number of hits to skip: `page_number * page_size`
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}
