//! Free-text query compilation

use crate::search::error::{SearchError, SearchResult};
use crate::search::query::{MultiMatchQuery, PageRequest, Query, ALL_FIELDS};

/// Compiled free-text search: a cross-field query plus the page to fetch
#[derive(Debug, Clone, PartialEq)]
pub struct TextSearch {
    pub query: Query,
    pub page: PageRequest,
}

impl TextSearch {
    /// Build a query matching `text` across every document field.
    ///
    /// The backend offset is `page_number * page_size`.
    pub fn compile(text: &str, page_size: u32, page_number: u32) -> SearchResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SearchError::InvalidQuery(
                "search text must not be empty".to_string(),
            ));
        }

        Ok(Self {
            query: Query::MultiMatch(MultiMatchQuery {
                text: text.to_string(),
                fields: vec![ALL_FIELDS.to_string()],
            }),
            page: PageRequest::new(page_size, page_number)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_text_search() {
        let search = TextSearch::compile("1389099.00", 10, 2).unwrap();

        assert_eq!(
            search.query,
            Query::MultiMatch(MultiMatchQuery {
                text: "1389099.00".to_string(),
                fields: vec!["*".to_string()],
            })
        );
        assert_eq!(search.page.offset(), 20);
        assert_eq!(search.page.page_size, 10);
    }

    #[test]
    fn test_blank_text_rejected() {
        assert!(matches!(
            TextSearch::compile("   ", 10, 0),
            Err(SearchError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(TextSearch::compile("error", 0, 0).is_err());
    }
}
