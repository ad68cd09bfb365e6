//! Rendering of the abstract query tree into the Elasticsearch query DSL

use crate::search::executor::SearchRequest;
use crate::search::query::{BoolQuery, Clause, MultiMatchQuery, Query};
use serde_json::{json, Map, Value};

/// Full `_search` request body
pub fn search_body(request: &SearchRequest) -> Value {
    json!({
        "query": render_query(&request.query),
        "from": request.page.offset(),
        "size": request.page.page_size,
        "track_total_hits": true,
    })
}

pub fn render_query(query: &Query) -> Value {
    match query {
        Query::MatchAll => json!({ "match_all": {} }),
        Query::Bool(bool_query) => render_bool(bool_query),
        Query::MultiMatch(multi_match) => render_multi_match(multi_match),
    }
}

fn render_bool(query: &BoolQuery) -> Value {
    let mut node = Map::new();
    if !query.must.is_empty() {
        node.insert(
            "must".to_string(),
            Value::Array(query.must.iter().map(render_clause).collect()),
        );
    }
    if !query.must_not.is_empty() {
        node.insert(
            "must_not".to_string(),
            Value::Array(query.must_not.iter().map(render_clause).collect()),
        );
    }
    json!({ "bool": node })
}

fn render_clause(clause: &Clause) -> Value {
    match clause {
        Clause::Equals { field, value } => {
            let mut inner = Map::new();
            inner.insert(field.clone(), value.to_json());
            json!({ "match": inner })
        }
        Clause::Range { field, gte, lte } => {
            let mut inner = Map::new();
            inner.insert(
                field.clone(),
                json!({ "gte": gte.to_json(), "lte": lte.to_json() }),
            );
            json!({ "range": inner })
        }
    }
}

fn render_multi_match(query: &MultiMatchQuery) -> Value {
    // lenient: numeric text must not fail against date or numeric fields
    json!({
        "multi_match": {
            "query": query.text,
            "fields": query.fields,
            "lenient": true,
        }
    })
}
