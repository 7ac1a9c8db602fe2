//! # bingsearch
//!
//! A Rust client for the Bing web search API.
//!
//! The client turns a query and optional keyword filters into the OData
//! parameters the API expects, signs the request with your application id
//! using basic authentication, and wraps the JSON answer in [`ResponseData`],
//! which exposes camel-cased fields under snake_case names.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bingsearch::{QueryKeyword, SearchClient, SearchOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SearchClient::new("YOUR_APP_ID")?;
//!
//!     let options = SearchOptions::new()
//!         .filter(QueryKeyword::Site, vec!["github.com", "rubyforge.org"])
//!         .top(10);
//!     let response = client.web("ruby", &options).await?;
//!
//!     for result in response.results() {
//!         let title = result.get("title").and_then(|v| v.as_str()).unwrap_or("");
//!         let url = result.get("url").and_then(|v| v.as_str()).unwrap_or("");
//!         println!("{title}: {url}");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod response;
pub mod types;
pub mod utils;

// Re-export common types
pub use client::SearchClient;
pub use config::ClientConfig;
pub use error::{SearchError, SearchResult as Result};
pub use response::{ResponseData, ResponseValue};
pub use types::{
    DebugOptions, FilterValue, HttpOptions, QueryKeyword, SearchOptions, SearchResult, Source,
};

/// Suggest what to check after a failed search
pub fn troubleshooting_info(error: &SearchError) -> String {
    match error.status_code() {
        Some(401 | 403) => "This is likely an authentication issue. Check that your Bing application id is valid and subscribed to the Web search source.".to_string(),
        Some(400) => "This is likely due to invalid request parameters. Check your query, keyword filters and extra parameters.".to_string(),
        Some(404) => "The endpoint was not found. Check the base URL and the search source.".to_string(),
        Some(429) => "You've exceeded the rate limit for this API. Try again later or reduce your request frequency.".to_string(),
        Some(500..=599) => "The search service is experiencing server issues. Try again later.".to_string(),
        _ => match error {
            SearchError::ConfigError(_) => format!(
                "Pass an application id explicitly, set BING_APP_ID, or store it in ~/{}.",
                config::APP_ID_FILE
            ),
            SearchError::Timeout { .. } => {
                "The request took too long. Increase the timeout or try again later.".to_string()
            }
            SearchError::ParseError(_) => {
                "The API answered with an unexpected document. Check that the base URL points at the search service.".to_string()
            }
            _ => "Check your Bing API credentials and make sure your search request is valid.".to_string(),
        },
    }
}
