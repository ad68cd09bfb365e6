use crate::search::config::SearchConfig;
use crate::search::error::{SearchError, SearchResult};
use crate::search::executor::{dsl, SearchExecutor, SearchRequest};
use crate::search::response::RawHits;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP/JSON executor for Elasticsearch-compatible clusters
#[derive(Clone)]
pub struct ElasticExecutor {
    client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<Hit>,
}

/// `hits.total` is a bare number on old clusters and an object on newer ones
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) => *n,
            TotalHits::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: Option<serde_json::Value>,
}

impl ElasticExecutor {
    /// Create an executor targeting the first configured node
    pub fn new(config: &SearchConfig) -> SearchResult<Self> {
        let node = config.nodes.first().ok_or_else(|| {
            SearchError::Configuration("at least one search node must be configured".to_string())
        })?;
        let credentials = config.credentials()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                SearchError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: node.trim_end_matches('/').to_string(),
            credentials,
            timeout_secs: config.request_timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.base_url, index)
    }
}

#[async_trait]
impl SearchExecutor for ElasticExecutor {
    async fn execute(&self, request: &SearchRequest) -> SearchResult<RawHits> {
        let url = self.search_url(&request.index);
        let body = dsl::search_body(request);
        debug!(url = %url, body = %body, "Sending search request");

        let mut builder = self
            .client
            .post(&url)
            .query(&[("ignore_unavailable", "true")])
            .json(&body);
        if let Some((user, password)) = &self.credentials {
            builder = builder.basic_auth(user, Some(password));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::BackendUnavailable(format!(
                    "search request timed out after {} seconds",
                    self.timeout_secs
                ))
            } else {
                SearchError::from(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                index = %request.index,
                status = status.as_u16(),
                "Search cluster rejected request"
            );
            return Err(SearchError::BackendUnavailable(format!(
                "search cluster returned {}: {}",
                status, text
            )));
        }

        let body: SearchResponseBody =
            response
                .json()
                .await
                .map_err(|e| SearchError::MalformedResult {
                    position: 0,
                    reason: format!("undecodable search response: {}", e),
                })?;

        let hits = body
            .hits
            .hits
            .into_iter()
            .enumerate()
            .map(|(position, hit)| {
                hit.source.ok_or_else(|| SearchError::MalformedResult {
                    position,
                    reason: "hit has no _source".to_string(),
                })
            })
            .collect::<SearchResult<Vec<_>>>()?;

        let total = body
            .hits
            .total
            .map(|t| t.value())
            .unwrap_or(hits.len() as u64);

        Ok(RawHits::new(hits, total))
    }

    fn name(&self) -> &'static str {
        "elasticsearch"
    }
}
