//! Filter-to-query compilation and paginated search
//!
//! This module turns backend-agnostic search intent into results:
//!
//! - **Query Compiler**: translates a [`Filter`](crate::models::Filter) into a
//!   boolean query with `must` and `must_not` clause groups
//! - **Text Search**: free-text query across every document field, paged
//! - **Field Tables**: optional per-entity logical -> serialized field names
//! - **Executors**: run compiled queries against a cluster (HTTP/JSON) or in
//!   process
//! - **Normalization**: raw hits + total count -> [`PagedResponse`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │           Search Service API                     │
//! ├─────────────────────────────────────────────────┤
//! │  - search_by_filter()  - search_by_text()       │
//! │  - search_by_filter_paged()                     │
//! └─────────────────────────────────────────────────┘
//!           │ compile                 ▲ normalize
//!           ▼                         │
//! ┌──────────────────────┐  ┌────────────────────────┐
//! │ QueryCompiler        │  │ normalize()            │
//! │ TextSearch           │  │ PagedResponse<T>       │
//! └──────────────────────┘  └────────────────────────┘
//!           │ Query + page            ▲ RawHits
//!           ▼                         │
//! ┌─────────────────────────────────────────────────┐
//! │           SearchExecutor                         │
//! │  ElasticExecutor | InMemoryExecutor              │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use filter_search::models::Filter;
//! use filter_search::search::{create_executor, PagedResponse, SearchConfig, SearchService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SearchConfig::default();
//!     let search = SearchService::new(create_executor(&config)?);
//!
//!     let filter = Filter::new()
//!         .and("indexValue", "1389099.00")
//!         .and_not("dateTime", "2022-09-18T08:40:00");
//!
//!     let results: PagedResponse<serde_json::Value> =
//!         search.search_by_filter(&filter, "tepix").await?;
//!     println!("Found {} documents", results.total_count);
//!
//!     Ok(())
//! }
//! ```

mod compiler;
mod config;
mod error;
pub mod executor;
mod fields;
mod query;
mod response;
mod service;
mod text;

pub use compiler::QueryCompiler;
pub use config::{SearchBackend, SearchConfig, SearchConfigBuilder};
pub use error::{SearchError, SearchResult};
pub use executor::{
    create_executor, ElasticExecutor, InMemoryExecutor, SearchExecutor, SearchRequest,
};
pub use fields::FieldMap;
pub use query::{BoolQuery, Clause, MultiMatchQuery, PageRequest, Query, ALL_FIELDS};
pub use response::{normalize, PagedResponse, RawHits};
pub use service::{SearchService, SearchServiceBuilder, ID_FIELD};
pub use text::TextSearch;
