//! Error types for search operations

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while compiling, executing or normalizing a search
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// A filter used a kind the compiler does not know
    #[error("Unsupported filter kind: {kind}")]
    UnsupportedFilterKind { kind: String },

    /// A filter of a known kind is malformed
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A filter referenced a field missing from the entity's field table
    #[error("Unknown field '{field}' for entity {entity}")]
    UnknownField { entity: String, field: String },

    /// Text query or pagination parameters are invalid
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The search cluster could not be reached or rejected the request
    #[error("Search backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A hit or the backend response could not be decoded
    #[error("Malformed result at position {position}: {reason}")]
    MalformedResult { position: usize, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl SearchError {
    /// Stable error code string
    pub fn error_code(&self) -> &str {
        match self {
            SearchError::UnsupportedFilterKind { .. } => "UNSUPPORTED_FILTER_KIND",
            SearchError::InvalidFilter(_) => "INVALID_FILTER",
            SearchError::UnknownField { .. } => "UNKNOWN_FIELD",
            SearchError::InvalidQuery(_) => "INVALID_QUERY",
            SearchError::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
            SearchError::MalformedResult { .. } => "MALFORMED_RESULT",
            SearchError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Whether the failure happened before any backend call
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            SearchError::UnsupportedFilterKind { .. }
                | SearchError::InvalidFilter(_)
                | SearchError::UnknownField { .. }
                | SearchError::InvalidQuery(_)
        )
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::BackendUnavailable(format!("request timed out: {}", err))
        } else if err.is_connect() {
            SearchError::BackendUnavailable(format!("failed to connect: {}", err))
        } else if err.is_decode() {
            SearchError::MalformedResult {
                position: 0,
                reason: err.to_string(),
            }
        } else {
            SearchError::BackendUnavailable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SearchError::UnsupportedFilterKind {
                kind: "or".to_string()
            }
            .error_code(),
            "UNSUPPORTED_FILTER_KIND"
        );
        assert_eq!(
            SearchError::BackendUnavailable("down".to_string()).error_code(),
            "BACKEND_UNAVAILABLE"
        );
    }

    #[test]
    fn test_compile_errors() {
        assert!(SearchError::InvalidFilter("x".to_string()).is_compile_error());
        assert!(!SearchError::MalformedResult {
            position: 1,
            reason: "x".to_string()
        }
        .is_compile_error());
    }

    #[test]
    fn test_display_names_offending_kind() {
        let err = SearchError::UnsupportedFilterKind {
            kind: "or".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported filter kind: or");
    }
}
