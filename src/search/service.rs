//! Main search service implementation

use crate::metrics;
use crate::models::{Filter, FilterValue};
use crate::search::compiler::QueryCompiler;
use crate::search::error::{SearchError, SearchResult};
use crate::search::executor::{SearchExecutor, SearchRequest};
use crate::search::fields::FieldMap;
use crate::search::query::{PageRequest, Query};
use crate::search::response::{normalize, PagedResponse};
use crate::search::text::TextSearch;
use serde::de::DeserializeOwned;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

const FILTER_KIND: &str = "filter";
const TEXT_KIND: &str = "text";
const ID_KIND: &str = "id";

/// Logical name of the identity field shared by every entity
pub const ID_FIELD: &str = "id";

/// Filter and free-text search over an injected executor
///
/// The service holds no mutable state, so one instance can serve any number
/// of concurrent searches.
#[derive(Clone)]
pub struct SearchService {
    executor: Arc<dyn SearchExecutor>,
    fields: Arc<HashMap<TypeId, FieldMap>>,
    default_page: PageRequest,
}

/// Builder for [`SearchService`]
pub struct SearchServiceBuilder {
    executor: Arc<dyn SearchExecutor>,
    fields: HashMap<TypeId, FieldMap>,
    default_page_size: u32,
}

impl SearchServiceBuilder {
    /// Page size used by [`SearchService::search_by_filter`]
    pub fn default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    /// Register the field table of entity type `T`.
    ///
    /// Filters searched as `T` then resolve property names through `fields`
    /// and fail on names the table does not list.
    pub fn register<T: 'static>(mut self, fields: FieldMap) -> SearchResult<Self> {
        if fields.is_empty() {
            return Err(SearchError::Configuration(format!(
                "field map for {} is empty",
                type_name::<T>()
            )));
        }
        if self.fields.insert(TypeId::of::<T>(), fields).is_some() {
            return Err(SearchError::Configuration(format!(
                "{} is already registered",
                type_name::<T>()
            )));
        }
        Ok(self)
    }

    pub fn build(self) -> SearchResult<SearchService> {
        Ok(SearchService {
            executor: self.executor,
            fields: Arc::new(self.fields),
            default_page: PageRequest::first(self.default_page_size)?,
        })
    }
}

impl SearchService {
    /// Service with pass-through field names and a default page size of 10
    pub fn new(executor: Arc<dyn SearchExecutor>) -> Self {
        Self {
            executor,
            fields: Arc::new(HashMap::new()),
            default_page: PageRequest {
                page_size: 10,
                page_number: 0,
            },
        }
    }

    pub fn builder(executor: Arc<dyn SearchExecutor>) -> SearchServiceBuilder {
        SearchServiceBuilder {
            executor,
            fields: HashMap::new(),
            default_page_size: 10,
        }
    }

    pub fn executor(&self) -> &Arc<dyn SearchExecutor> {
        &self.executor
    }

    pub fn default_page(&self) -> PageRequest {
        self.default_page
    }

    /// Compile a filter for entity type `T`, using its field table if registered
    pub fn compile_filter<T: 'static>(&self, filter: &Filter) -> SearchResult<Query> {
        match self.fields.get(&TypeId::of::<T>()) {
            Some(fields) => QueryCompiler::with_fields(fields).compile(filter),
            None => QueryCompiler::new().compile(filter),
        }
    }

    /// Search `index` with a filter, returning the first page of the default size
    pub async fn search_by_filter<T>(
        &self,
        filter: &Filter,
        index: &str,
    ) -> SearchResult<PagedResponse<T>>
    where
        T: DeserializeOwned + 'static,
    {
        self.run(FILTER_KIND, index, self.default_page, || {
            self.compile_filter::<T>(filter)
        })
        .await
    }

    /// Search `index` with a filter and explicit paging
    pub async fn search_by_filter_paged<T>(
        &self,
        filter: &Filter,
        page_size: u32,
        page_number: u32,
        index: &str,
    ) -> SearchResult<PagedResponse<T>>
    where
        T: DeserializeOwned + 'static,
    {
        let page = PageRequest::new(page_size, page_number);
        match page {
            Ok(page) => {
                self.run(FILTER_KIND, index, page, || self.compile_filter::<T>(filter))
                    .await
            }
            Err(e) => {
                metrics::record_search(FILTER_KIND, e.error_code(), 0.0, 0);
                Err(e)
            }
        }
    }

    /// First document of `index` whose id equals `id`, if any
    pub async fn search_by_id<T, K>(&self, id: &K, index: &str) -> SearchResult<Option<T>>
    where
        T: DeserializeOwned + 'static,
        K: Clone + Into<FilterValue>,
    {
        let filter = Filter::new().and(ID_FIELD, id.clone());
        let page = PageRequest {
            page_size: 1,
            page_number: 0,
        };

        let response: PagedResponse<T> = self
            .run(ID_KIND, index, page, || self.compile_filter::<T>(&filter))
            .await?;
        Ok(response.data.into_iter().next())
    }

    /// Free-text search across all document fields
    pub async fn search_by_text<T>(
        &self,
        text: &str,
        page_size: u32,
        page_number: u32,
        index: &str,
    ) -> SearchResult<PagedResponse<T>>
    where
        T: DeserializeOwned,
    {
        let search = match TextSearch::compile(text, page_size, page_number) {
            Ok(search) => search,
            Err(e) => {
                metrics::record_search(TEXT_KIND, e.error_code(), 0.0, 0);
                return Err(e);
            }
        };

        self.run(TEXT_KIND, index, search.page, move || Ok(search.query))
            .await
    }

    async fn run<T, F>(
        &self,
        kind: &'static str,
        index: &str,
        page: PageRequest,
        compile: F,
    ) -> SearchResult<PagedResponse<T>>
    where
        T: DeserializeOwned,
        F: FnOnce() -> SearchResult<Query>,
    {
        let started = Instant::now();
        let result = self.execute(kind, index, page, compile).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(response) => {
                debug!(
                    kind,
                    index,
                    backend = self.executor.name(),
                    total_count = response.total_count,
                    returned = response.data.len(),
                    "Search completed"
                );
                metrics::record_search(kind, "ok", elapsed, response.data.len());
            }
            Err(e) => {
                warn!(
                    kind,
                    index,
                    backend = self.executor.name(),
                    error_code = e.error_code(),
                    error = %e,
                    "Search failed"
                );
                metrics::record_search(kind, e.error_code(), elapsed, 0);
            }
        }

        result
    }

    async fn execute<T, F>(
        &self,
        kind: &'static str,
        index: &str,
        page: PageRequest,
        compile: F,
    ) -> SearchResult<PagedResponse<T>>
    where
        T: DeserializeOwned,
        F: FnOnce() -> SearchResult<Query>,
    {
        if index.trim().is_empty() {
            return Err(SearchError::InvalidQuery(
                "index name must not be empty".to_string(),
            ));
        }

        let query = compile()?;
        debug!(kind, index, query = ?query, offset = page.offset(), size = page.page_size, "Compiled search");

        let request = SearchRequest::new(index, query, page);
        let raw = self.executor.execute(&request).await?;
        normalize(raw, page)
    }
}
