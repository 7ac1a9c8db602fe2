//! HTTP utilities for making requests to the search API

use crate::config::DEFAULT_TIMEOUT_MS;
use crate::error::{SearchError, SearchResult};
use crate::types::HttpOptions;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Client, Request, Response, StatusCode};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("bingsearch-rust/", env!("CARGO_PKG_VERSION"));

/// Placeholder written wherever a credential would appear
pub const REDACTED: &str = "***";

/// Everything needed to issue one search request
#[derive(Clone)]
pub struct SearchRequest {
    /// Endpoint URL, without query string
    pub url: String,
    /// Query-string parameters
    pub query: BTreeMap<String, String>,
    /// Basic auth username
    pub username: String,
    /// Basic auth password (the application id)
    pub password: String,
    /// Per-request transport options
    pub http: HttpOptions,
}

impl fmt::Debug for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchRequest")
            .field("url", &self.url)
            .field("query", &self.query)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("http", &self.http)
            .finish()
    }
}

/// Serializable snapshot of an outgoing request
#[derive(Debug, Serialize)]
pub struct RequestDump {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: Option<u64>,
}

impl RequestDump {
    /// Snapshot a built request, redacting its credentials
    pub fn from_request(request: &Request) -> Self {
        let mut headers = header_map(request.headers());
        if headers.contains_key(AUTHORIZATION.as_str()) {
            headers.insert(AUTHORIZATION.as_str().to_string(), REDACTED.to_string());
        }

        Self {
            method: request.method().to_string(),
            url: request.url().to_string(),
            headers,
            timeout_ms: request.timeout().map(|t| t.as_millis() as u64),
        }
    }

    pub fn to_yaml(&self) -> String {
        to_yaml(self)
    }
}

/// Serializable snapshot of a received response
#[derive(Debug, Serialize)]
pub struct ResponseDump {
    pub status: u16,
    pub reason: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ResponseDump {
    pub fn new(status: StatusCode, headers: &HeaderMap, body: String) -> Self {
        Self {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            headers: header_map(headers),
            body,
        }
    }

    pub fn to_yaml(&self) -> String {
        to_yaml(self)
    }
}

fn to_yaml<T: Serialize + fmt::Debug>(value: &T) -> String {
    serde_yaml::to_string(value).unwrap_or_else(|e| {
        log::warn!("Could not serialize {value:?} as YAML: {e}");
        format!("{value:?}")
    })
}

fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// HTTP client wrapper with search-specific functionality
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> SearchResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_MS)
    }

    /// Create a new HTTP client with custom timeout
    pub fn with_timeout(timeout_ms: u64) -> SearchResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SearchError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            default_timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Build the GET request described by `search`
    pub fn build_request(&self, search: &SearchRequest) -> SearchResult<Request> {
        let timeout = search
            .http
            .timeout
            .map(Duration::from_millis)
            .unwrap_or(self.default_timeout);

        let mut builder = self
            .client
            .get(&search.url)
            .query(&search.query)
            .basic_auth(&search.username, Some(&search.password))
            .timeout(timeout);

        for (name, value) in &search.http.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder.build().map_err(|e| SearchError::HttpError {
            message: format!("Failed to build request: {e}"),
            status_code: None,
        })
    }

    /// Issue a search request and return the parsed JSON body.
    ///
    /// Only `200 OK` counts as success; any other status becomes
    /// [`SearchError::ApiError`] carrying YAML dumps of request and response.
    pub async fn send_search(&self, search: &SearchRequest) -> SearchResult<serde_json::Value> {
        let request = self.build_request(search)?;
        let timeout_ms = request
            .timeout()
            .map(|t| t.as_millis() as u64)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let request_dump = RequestDump::from_request(&request);

        log::debug!("GET {}", request_dump.url);

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| transport_error(e, timeout_ms))?;

        self.handle_search_response(response, request_dump, timeout_ms)
            .await
    }

    async fn handle_search_response(
        &self,
        response: Response,
        request_dump: RequestDump,
        timeout_ms: u64,
    ) -> SearchResult<serde_json::Value> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, timeout_ms))?;

        if status != StatusCode::OK {
            log::warn!("Search request failed with status {status}");
            let response_dump = ResponseDump::new(status, &headers, body);
            return Err(SearchError::ApiError {
                status_code: status.as_u16(),
                request: request_dump.to_yaml(),
                response: response_dump.to_yaml(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            SearchError::ParseError(format!("Failed to parse search response: {e}"))
        })
    }
}

/// Map a transport failure, reporting the timeout the request actually used
fn transport_error(error: reqwest::Error, timeout_ms: u64) -> SearchError {
    if error.is_timeout() {
        SearchError::Timeout { timeout_ms }
    } else {
        SearchError::from(error)
    }
}

/// Build a URL with query parameters
pub fn build_url(base_url: &str, params: &BTreeMap<String, String>) -> SearchResult<String> {
    let mut url = Url::parse(base_url)?;

    for (key, value) in params {
        url.query_pairs_mut().append_pair(key, value);
    }

    Ok(url.to_string())
}

/// Append a path segment to a base URL
pub fn join_path(base_url: &str, segment: &str) -> SearchResult<String> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| SearchError::InvalidInput(format!("URL cannot have a path: {base_url}")))?
        .pop_if_empty()
        .push(segment);
    Ok(url.to_string())
}

/// Extract domain from a URL
pub fn extract_domain(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|host| host.to_string()))
}

/// Normalize text by removing excess whitespace
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
