use crate::models::FilterValue;
use crate::search::error::{SearchError, SearchResult};
use crate::search::executor::{SearchExecutor, SearchRequest};
use crate::search::query::{Clause, MultiMatchQuery, Query, ALL_FIELDS};
use crate::search::response::RawHits;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process executor evaluating queries over JSON documents
///
/// Documents keep their insertion order, which stands in for relevance order.
#[derive(Default)]
pub struct InMemoryExecutor {
    indexes: RwLock<HashMap<String, Vec<Value>>>,
}

impl InMemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document to an index, creating the index if needed
    pub async fn index_document<T: Serialize>(&self, index: &str, document: &T) -> SearchResult<()> {
        let value = to_document(document)?;
        let mut indexes = self.indexes.write().await;
        indexes.entry(index.to_string()).or_default().push(value);
        Ok(())
    }

    /// Add several documents, returning how many were stored
    pub async fn index_documents<T: Serialize>(
        &self,
        index: &str,
        documents: &[T],
    ) -> SearchResult<usize> {
        let values = documents
            .iter()
            .map(to_document)
            .collect::<SearchResult<Vec<_>>>()?;
        let count = values.len();

        let mut indexes = self.indexes.write().await;
        indexes.entry(index.to_string()).or_default().extend(values);
        Ok(count)
    }

    /// Number of documents stored in an index
    pub async fn count(&self, index: &str) -> usize {
        self.indexes
            .read()
            .await
            .get(index)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Drop every document of an index
    pub async fn clear(&self, index: &str) {
        self.indexes.write().await.remove(index);
    }
}

fn to_document<T: Serialize>(document: &T) -> SearchResult<Value> {
    match serde_json::to_value(document) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(SearchError::InvalidQuery(
            "documents must serialize to JSON objects".to_string(),
        )),
        Err(e) => Err(SearchError::InvalidQuery(format!(
            "document could not be serialized: {}",
            e
        ))),
    }
}

#[async_trait]
impl SearchExecutor for InMemoryExecutor {
    async fn execute(&self, request: &SearchRequest) -> SearchResult<RawHits> {
        let indexes = self.indexes.read().await;
        let Some(documents) = indexes.get(&request.index) else {
            return Ok(RawHits::empty());
        };

        let matching: Vec<&Value> = documents
            .iter()
            .filter(|doc| matches_query(doc, &request.query))
            .collect();

        let total = matching.len() as u64;
        let offset = usize::try_from(request.page.offset()).unwrap_or(usize::MAX);
        let hits = matching
            .into_iter()
            .skip(offset)
            .take(request.page.page_size as usize)
            .cloned()
            .collect();

        Ok(RawHits::new(hits, total))
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

fn matches_query(doc: &Value, query: &Query) -> bool {
    match query {
        Query::MatchAll => true,
        Query::Bool(bool_query) => {
            bool_query.must.iter().all(|c| matches_clause(doc, c))
                && !bool_query.must_not.iter().any(|c| matches_clause(doc, c))
        }
        Query::MultiMatch(multi_match) => matches_text(doc, multi_match),
    }
}

fn matches_clause(doc: &Value, clause: &Clause) -> bool {
    let Some(field_value) = lookup(doc, clause.field()) else {
        return false;
    };

    any_scalar(field_value, &|scalar: &Value| match clause {
        Clause::Equals { value, .. } => compare(scalar, value) == Some(Ordering::Equal),
        Clause::Range { gte, lte, .. } => {
            matches!(compare(scalar, gte), Some(Ordering::Greater | Ordering::Equal))
                && matches!(compare(scalar, lte), Some(Ordering::Less | Ordering::Equal))
        }
    })
}

fn compare(scalar: &Value, value: &FilterValue) -> Option<Ordering> {
    FilterValue::from_json(scalar).and_then(|doc_value| doc_value.compare(value))
}

/// Follow a dotted path through nested objects
fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(value) = doc.get(path) {
        return Some(value);
    }
    path.split('.').try_fold(doc, |current, segment| current.get(segment))
}

fn any_scalar(value: &Value, predicate: &dyn Fn(&Value) -> bool) -> bool {
    match value {
        Value::Array(items) => items.iter().any(|item| any_scalar(item, predicate)),
        Value::Object(_) | Value::Null => false,
        scalar => predicate(scalar),
    }
}

fn matches_text(doc: &Value, query: &MultiMatchQuery) -> bool {
    let tokens: Vec<String> = query
        .text
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if tokens.is_empty() {
        return false;
    }

    let leaves: Vec<String> = if query.fields.iter().any(|f| f == ALL_FIELDS) {
        let mut leaves = Vec::new();
        collect_leaves(doc, &mut leaves);
        leaves
    } else {
        let mut leaves = Vec::new();
        for field in &query.fields {
            if let Some(value) = lookup(doc, field) {
                collect_leaves(value, &mut leaves);
            }
        }
        leaves
    };

    leaves
        .iter()
        .any(|leaf| tokens.iter().any(|token| leaf.contains(token.as_str())))
}

fn collect_leaves(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => map.values().for_each(|v| collect_leaves(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect_leaves(v, out)),
        Value::String(s) => out.push(s.to_lowercase()),
        Value::Number(n) => out.push(n.to_string()),
        Value::Bool(b) => out.push(b.to_string()),
        Value::Null => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Filter;
    use crate::search::compiler::QueryCompiler;
    use crate::search::query::PageRequest;
    use crate::search::text::TextSearch;
    use serde_json::json;

    fn request(query: Query, size: u32, number: u32) -> SearchRequest {
        SearchRequest::new("docs", query, PageRequest::new(size, number).unwrap())
    }

    fn seeded() -> InMemoryExecutor {
        let executor = InMemoryExecutor::new();
        tokio_test::block_on(executor.index_documents(
            "docs",
            &[
                json!({"name": "alpha", "price": 10, "meta": {"tag": "red"}, "labels": ["x", "y"]}),
                json!({"name": "beta", "price": "20.5", "meta": {"tag": "blue"}, "labels": []}),
                json!({"name": "gamma", "price": 30, "created": "2022-09-18T08:00:00"}),
            ],
        ))
        .unwrap();
        executor
    }

    fn names(hits: &RawHits) -> Vec<&str> {
        hits.hits
            .iter()
            .map(|h| h["name"].as_str().unwrap())
            .collect()
    }

    fn compile(filter: Filter) -> Query {
        QueryCompiler::new().compile(&filter).unwrap()
    }

    #[test]
    fn test_missing_index_is_empty() {
        let executor = InMemoryExecutor::new();
        let hits = tokio_test::block_on(executor.execute(&request(Query::MatchAll, 10, 0))).unwrap();
        assert_eq!(hits, RawHits::empty());
    }

    #[test]
    fn test_numeric_range_covers_numeric_strings() {
        let executor = seeded();
        let query = compile(Filter::new().between("price", 10, 20.5));
        let hits = tokio_test::block_on(executor.execute(&request(query, 10, 0))).unwrap();
        assert_eq!(names(&hits), vec!["alpha", "beta"]);
        assert_eq!(hits.total, 2);
    }

    #[test]
    fn test_large_integer_ids_match_exactly() {
        let executor = InMemoryExecutor::new();
        tokio_test::block_on(executor.index_documents(
            "docs",
            &[
                json!({"name": "upper", "id": 9_007_199_254_740_993u64}),
                json!({"name": "lower", "id": 9_007_199_254_740_992u64}),
            ],
        ))
        .unwrap();

        let query = compile(Filter::new().and("id", 9_007_199_254_740_993u64));
        let hits = tokio_test::block_on(executor.execute(&request(query, 10, 0))).unwrap();
        assert_eq!(names(&hits), vec!["upper"]);
        assert_eq!(hits.total, 1);

        let query = compile(Filter::new().between("id", 0, 9_007_199_254_740_992u64));
        let hits = tokio_test::block_on(executor.execute(&request(query, 10, 0))).unwrap();
        assert_eq!(names(&hits), vec!["lower"]);
    }

    #[test]
    fn test_nested_and_array_fields() {
        let executor = seeded();

        let query = compile(Filter::new().and("meta.tag", "blue"));
        let hits = tokio_test::block_on(executor.execute(&request(query, 10, 0))).unwrap();
        assert_eq!(names(&hits), vec!["beta"]);

        let query = compile(Filter::new().and("labels", "y"));
        let hits = tokio_test::block_on(executor.execute(&request(query, 10, 0))).unwrap();
        assert_eq!(names(&hits), vec!["alpha"]);
    }

    #[test]
    fn test_must_not_excludes() {
        let executor = seeded();
        let query = compile(Filter::new().and_not("name", "beta"));
        let hits = tokio_test::block_on(executor.execute(&request(query, 10, 0))).unwrap();
        assert_eq!(names(&hits), vec!["alpha", "gamma"]);
    }

    #[test]
    fn test_paging_reports_full_total() {
        let executor = seeded();
        let hits = tokio_test::block_on(executor.execute(&request(Query::MatchAll, 2, 1))).unwrap();
        assert_eq!(names(&hits), vec!["gamma"]);
        assert_eq!(hits.total, 3);

        let hits = tokio_test::block_on(executor.execute(&request(Query::MatchAll, 2, 7))).unwrap();
        assert!(hits.hits.is_empty());
        assert_eq!(hits.total, 3);
    }

    #[test]
    fn test_text_search_across_fields() {
        let executor = seeded();
        let search = TextSearch::compile("RED", 10, 0).unwrap();
        let hits = tokio_test::block_on(executor.execute(&SearchRequest::new(
            "docs",
            search.query,
            search.page,
        )))
        .unwrap();
        assert_eq!(names(&hits), vec!["alpha"]);
    }

    #[test]
    fn test_non_object_documents_rejected() {
        let executor = InMemoryExecutor::new();
        let result = tokio_test::block_on(executor.index_document("docs", &json!(5)));
        assert!(result.is_err());
    }
}
