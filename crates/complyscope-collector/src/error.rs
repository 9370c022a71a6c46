//! Error types for signal collection and audits.

use complyscope_audit::AuditError;
use complyscope_browser::BrowserError;
use complyscope_core::{ConfigError, CoreError};
use thiserror::Error;

/// Errors raised while acquiring signals or running an audit.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Browser launch, navigation or extraction failed
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// Fetched page had no readable text
    #[error("no readable text at {url}")]
    EmptyBody {
        /// Requested URL
        url: String,
    },

    /// Bundle construction or checklist loading failed
    #[error("audit error: {0}")]
    Audit(#[from] AuditError),

    /// Invalid target or configuration
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<ConfigError> for CollectError {
    fn from(err: ConfigError) -> Self {
        Self::Core(err.into())
    }
}

/// Result type alias for collection operations.
pub type Result<T> = std::result::Result<T, CollectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CollectError::HttpStatus {
            url: "https://example.com/privacy".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "HTTP 503 from https://example.com/privacy");

        let err: CollectError = BrowserError::Timeout("slow".to_string()).into();
        assert_eq!(err.to_string(), "browser error: timeout: slow");
    }
}
