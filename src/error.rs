//! Error types for the Bing search client

use thiserror::Error;

/// Result type alias for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Error types for search operations
#[derive(Error, Debug, Clone)]
pub enum SearchError {
    /// HTTP request could not be completed
    #[error("HTTP request failed: {message}")]
    HttpError {
        message: String,
        status_code: Option<u16>,
    },

    /// The API answered with something other than 200 OK.
    ///
    /// `request` and `response` are YAML dumps of both sides of the exchange,
    /// with credentials redacted.
    #[error("API request failed with status {status_code}\n{request}\n{response}")]
    ApiError {
        status_code: u16,
        request: String,
        response: String,
    },

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Parsing error (JSON, response envelope)
    #[error("Parsing error: {0}")]
    ParseError(String),

    /// A response field was looked up that the document does not carry
    #[error("No field named '{0}' in response data")]
    MissingField(String),

    /// Timeout error
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Generic error for unhandled cases
    #[error("Search error: {0}")]
    Other(String),
}

impl SearchError {
    /// HTTP status code carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SearchError::ApiError { status_code, .. } => Some(*status_code),
            SearchError::HttpError { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            SearchError::Timeout {
                timeout_ms: crate::config::DEFAULT_TIMEOUT_MS,
            }
        } else {
            SearchError::HttpError {
                message: error.to_string(),
                status_code: error.status().map(|s| s.as_u16()),
            }
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(error: serde_json::Error) -> Self {
        SearchError::ParseError(format!("JSON parsing failed: {error}"))
    }
}

impl From<url::ParseError> for SearchError {
    fn from(error: url::ParseError) -> Self {
        SearchError::InvalidInput(format!("Invalid URL: {error}"))
    }
}

impl From<std::io::Error> for SearchError {
    fn from(error: std::io::Error) -> Self {
        SearchError::Other(format!("IO error: {error}"))
    }
}
