//! Search executor adapters
//!
//! An executor runs a compiled [`Query`] against one index of a search
//! cluster and reports the raw hits of the requested page plus the total
//! match count. The search service never builds clients itself; it is handed
//! an executor created here or by the caller.

pub mod dsl;
mod elastic;
mod memory;

pub use elastic::ElasticExecutor;
pub use memory::InMemoryExecutor;

use crate::search::config::{SearchBackend, SearchConfig};
use crate::search::error::SearchResult;
use crate::search::query::{PageRequest, Query};
use crate::search::response::RawHits;
use async_trait::async_trait;
use std::sync::Arc;

/// Everything an executor needs for one search call
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub index: String,
    pub query: Query,
    pub page: PageRequest,
}

impl SearchRequest {
    pub fn new(index: impl Into<String>, query: Query, page: PageRequest) -> Self {
        Self {
            index: index.into(),
            query,
            page,
        }
    }
}

/// Executes compiled queries against a search backend
#[async_trait]
pub trait SearchExecutor: Send + Sync {
    /// Run the query and return the requested page of hits with the total count
    async fn execute(&self, request: &SearchRequest) -> SearchResult<RawHits>;

    /// Backend name used in logs and metrics
    fn name(&self) -> &'static str;
}

/// Create an executor based on configuration
pub fn create_executor(config: &SearchConfig) -> SearchResult<Arc<dyn SearchExecutor>> {
    match config.backend {
        SearchBackend::Elasticsearch => {
            tracing::info!(nodes = ?config.nodes, "Initializing Elasticsearch executor");
            Ok(Arc::new(ElasticExecutor::new(config)?))
        }
        SearchBackend::InMemory => {
            tracing::info!("Initializing in-memory executor");
            Ok(Arc::new(InMemoryExecutor::new()))
        }
    }
}
