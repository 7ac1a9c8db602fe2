//! Core types for the Bing search client

use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Call-level parameter names that are never forwarded from `SearchOptions::params`
pub const BASE_OPTIONS: [&str; 5] = ["version", "market", "adult", "query", "appid"];

/// Parameter names the API expects with a `$` prefix
pub const RESERVED_OPTIONS: [&str; 2] = ["top", "skip"];

/// A flattened web search hit extracted from a response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result identifier assigned by the API
    pub id: Option<String>,
    /// Title of the web page
    pub title: String,
    /// URL of the search result
    pub url: String,
    /// Description of the web page
    pub snippet: Option<String>,
    /// URL as shown to users
    pub display_url: Option<String>,
    /// The source website domain
    pub domain: Option<String>,
    /// Raw result entry as returned by the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

/// Search sources exposed by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Web,
}

impl Source {
    /// Every source the client can query
    pub const ALL: [Source; 1] = [Source::Web];

    /// Name used by the API (and as the request path segment)
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Web => "Web",
        }
    }

    /// snake_case name of the matching convenience method on `SearchClient`
    pub fn method_name(&self) -> String {
        let name = self.as_str();
        let mut out = String::with_capacity(name.len() + 4);
        let mut prev_lower = false;
        for c in name.chars() {
            if c.is_ascii_uppercase() && prev_lower {
                out.push('_');
            }
            prev_lower = c.is_ascii_lowercase();
            out.push(c.to_ascii_lowercase());
        }
        out
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| {
                source.as_str().eq_ignore_ascii_case(s) || source.method_name() == s.to_lowercase()
            })
            .ok_or_else(|| SearchError::InvalidInput(format!("Unknown search source: {s}")))
    }
}

/// Bing query keywords that can be used as result filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKeyword {
    Site,
    Language,
    Contains,
    Filetype,
    Inanchor,
    Inbody,
    Intitle,
    Ip,
    Loc,
    Location,
    Prefer,
    Feed,
    Hasfeed,
    Url,
}

impl QueryKeyword {
    pub const ALL: [QueryKeyword; 14] = [
        QueryKeyword::Site,
        QueryKeyword::Language,
        QueryKeyword::Contains,
        QueryKeyword::Filetype,
        QueryKeyword::Inanchor,
        QueryKeyword::Inbody,
        QueryKeyword::Intitle,
        QueryKeyword::Ip,
        QueryKeyword::Loc,
        QueryKeyword::Location,
        QueryKeyword::Prefer,
        QueryKeyword::Feed,
        QueryKeyword::Hasfeed,
        QueryKeyword::Url,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKeyword::Site => "site",
            QueryKeyword::Language => "language",
            QueryKeyword::Contains => "contains",
            QueryKeyword::Filetype => "filetype",
            QueryKeyword::Inanchor => "inanchor",
            QueryKeyword::Inbody => "inbody",
            QueryKeyword::Intitle => "intitle",
            QueryKeyword::Ip => "ip",
            QueryKeyword::Loc => "loc",
            QueryKeyword::Location => "location",
            QueryKeyword::Prefer => "prefer",
            QueryKeyword::Feed => "feed",
            QueryKeyword::Hasfeed => "hasfeed",
            QueryKeyword::Url => "url",
        }
    }
}

impl fmt::Display for QueryKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryKeyword {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        QueryKeyword::ALL
            .into_iter()
            .find(|kw| kw.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SearchError::InvalidInput(format!("Unknown query keyword: {s}")))
    }
}

/// Value of a keyword filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Sent as the parameter value verbatim
    One(String),
    /// Any of the values may match; sent as an OR-joined sub-expression
    AnyOf(Vec<String>),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::One(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::One(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::AnyOf(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        FilterValue::AnyOf(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for FilterValue {
    fn from(values: &[&str]) -> Self {
        FilterValue::AnyOf(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Debug options for the search client
#[derive(Debug, Clone, Default)]
pub struct DebugOptions {
    /// Enable verbose logging
    pub enabled: bool,
    /// Log request details (URLs, parameters)
    pub log_requests: bool,
    /// Log full responses
    pub log_responses: bool,
}

/// Transport options applied to a single request
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// Request timeout in milliseconds, overriding the client default
    pub timeout: Option<u64>,
    /// Extra request headers
    pub headers: BTreeMap<String, String>,
}

/// Options for a single search call
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Query keyword filters
    pub filters: BTreeMap<QueryKeyword, FilterValue>,
    /// Number of results to return (`$top`)
    pub top: Option<u32>,
    /// Number of results to skip (`$skip`)
    pub skip: Option<u32>,
    /// Additional parameters passed through to the API
    pub params: BTreeMap<String, String>,
    /// Transport options
    pub http: HttpOptions,
    /// Debug options
    pub debug: Option<DebugOptions>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, keyword: QueryKeyword, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(keyword, value.into());
        self
    }

    pub fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn timeout(mut self, timeout_ms: u64) -> Self {
        self.http.timeout = Some(timeout_ms);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.http.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn debug(mut self, debug: DebugOptions) -> Self {
        self.debug = Some(debug);
        self
    }
}
