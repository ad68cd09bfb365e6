use crate::search::SearchError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Search errors
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::Search(e) => e.error_code(),
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Process exit code for command-line use
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Search(e) if e.is_compile_error() => 2,
            AppError::Configuration(_) => 78,
            _ => 1,
        }
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err: AppError = SearchError::UnsupportedFilterKind {
            kind: "or".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "UNSUPPORTED_FILTER_KIND");
        assert_eq!(err.to_string(), "Unsupported filter kind: or");
        assert_eq!(err.exit_code(), 2);

        assert_eq!(
            AppError::Configuration("test".to_string()).error_code(),
            "CONFIGURATION_ERROR"
        );
    }

    #[test]
    fn test_backend_errors_exit_with_failure() {
        let err: AppError = SearchError::BackendUnavailable("down".to_string()).into();
        assert_eq!(err.exit_code(), 1);
    }
}
