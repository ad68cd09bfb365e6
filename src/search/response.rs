//! Paged response envelope and hit normalization

use crate::search::error::{SearchError, SearchResult};
use crate::search::query::PageRequest;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Raw page of hits as reported by an executor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHits {
    /// Document sources, in backend order
    pub hits: Vec<serde_json::Value>,

    /// Total matches regardless of page size
    pub total: u64,
}

impl RawHits {
    pub fn new(hits: Vec<serde_json::Value>, total: u64) -> Self {
        Self { hits, total }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// One page of typed results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub total_count: u64,
    pub page_size: u32,
    pub page_number: u32,
}

impl<T> PagedResponse<T> {
    pub fn empty(page: PageRequest) -> Self {
        Self {
            data: Vec::new(),
            total_count: 0,
            page_size: page.page_size,
            page_number: page.page_number,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of pages needed for `total_count` matches
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.page_number) + 1 < self.total_pages()
    }

    /// Convert the payload while keeping the paging metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PagedResponse<U> {
        PagedResponse {
            data: self.data.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_size: self.page_size,
            page_number: self.page_number,
        }
    }
}

/// Deserialize every hit into `T`, keeping backend order.
///
/// `total_count` comes from the executor's total, not from the page length.
pub fn normalize<T: DeserializeOwned>(
    raw: RawHits,
    page: PageRequest,
) -> SearchResult<PagedResponse<T>> {
    let data = raw
        .hits
        .into_iter()
        .enumerate()
        .map(|(position, hit)| {
            serde_json::from_value(hit).map_err(|e| SearchError::MalformedResult {
                position,
                reason: e.to_string(),
            })
        })
        .collect::<SearchResult<Vec<T>>>()?;

    Ok(PagedResponse {
        data,
        total_count: raw.total,
        page_size: page.page_size,
        page_number: page.page_number,
    })
}
