//! Filter -> boolean query compilation

use crate::models::{EqualityFilter, Filter, FilterValue, Filtering, RangeFilter};
use crate::search::error::{SearchError, SearchResult};
use crate::search::fields::FieldMap;
use crate::search::query::{BoolQuery, Clause, Query};
use std::cmp::Ordering;

/// Stateless translator from [`Filter`] to [`Query`]
///
/// Field names pass through unchanged unless a [`FieldMap`] is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryCompiler<'a> {
    fields: Option<&'a FieldMap>,
}

impl<'a> QueryCompiler<'a> {
    pub fn new() -> Self {
        Self { fields: None }
    }

    /// Resolve property names through `fields`
    pub fn with_fields(fields: &'a FieldMap) -> Self {
        Self {
            fields: Some(fields),
        }
    }

    /// Compile a filter. An empty filter compiles to [`Query::MatchAll`].
    pub fn compile(&self, filter: &Filter) -> SearchResult<Query> {
        let mut query = BoolQuery::default();

        for filtering in filter.iter() {
            match filtering {
                Filtering::And(eq) => query.must.push(self.equality(eq)?),
                Filtering::AndNot(eq) => query.must_not.push(self.equality(eq)?),
                Filtering::Between(range) => query.must.push(self.range(range)?),
            }
        }

        if query.is_empty() {
            Ok(Query::MatchAll)
        } else {
            Ok(Query::Bool(query))
        }
    }

    /// Decode a JSON filter document and compile it
    pub fn compile_value(&self, value: serde_json::Value) -> SearchResult<Query> {
        self.compile(&Filter::from_value(value)?)
    }

    fn equality(&self, filter: &EqualityFilter) -> SearchResult<Clause> {
        Ok(Clause::Equals {
            field: self.field(&filter.property_name)?,
            value: filter.property_value.clone(),
        })
    }

    fn range(&self, filter: &RangeFilter) -> SearchResult<Clause> {
        let field = self.field(&filter.property_name)?;
        check_bounds(&field, &filter.left_value, &filter.right_value)?;

        Ok(Clause::Range {
            field,
            gte: filter.left_value.clone(),
            lte: filter.right_value.clone(),
        })
    }

    fn field(&self, property_name: &str) -> SearchResult<String> {
        if property_name.trim().is_empty() {
            return Err(SearchError::InvalidFilter(
                "property name must not be empty".to_string(),
            ));
        }

        match self.fields {
            Some(fields) => fields.resolve(property_name).map(str::to_string),
            None => Ok(property_name.to_string()),
        }
    }
}

fn check_bounds(field: &str, left: &FilterValue, right: &FilterValue) -> SearchResult<()> {
    match left.compare(right) {
        Some(Ordering::Greater) => Err(SearchError::InvalidFilter(format!(
            "range on '{}' has lower bound {} above upper bound {}",
            field, left, right
        ))),
        Some(_) => Ok(()),
        None => Err(SearchError::InvalidFilter(format!(
            "range on '{}' has incomparable bounds {} and {}",
            field, left, right
        ))),
    }
}
