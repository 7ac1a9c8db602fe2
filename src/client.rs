//! Bing search API client

use crate::{
    config::{self, ClientConfig},
    error::{SearchError, SearchResult},
    query,
    response::ResponseData,
    types::{SearchOptions, Source},
    utils::{
        debug,
        http::{self, HttpClient, SearchRequest},
    },
};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Client for the Bing search API.
///
/// Holds the application id used to sign requests and a set of default
/// parameters sent with every query.
#[derive(Debug)]
pub struct SearchClient {
    config: ClientConfig,
    http_client: HttpClient,
    user_app_id: OnceLock<Option<String>>,
}

impl SearchClient {
    /// Create a client signing requests with `app_id`
    pub fn new(app_id: &str) -> SearchResult<Self> {
        Self::with_config(ClientConfig {
            app_id: Some(app_id.to_string()),
            ..Default::default()
        })
    }

    /// Create a client that takes its application id from `~/.bing_app_id`
    pub fn from_user_config() -> SearchResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> SearchResult<Self> {
        config.validate()?;
        let http_client = HttpClient::with_timeout(config.timeout_ms)?;

        Ok(Self {
            config,
            http_client,
            user_app_id: OnceLock::new(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> SearchResult<Self> {
        self.config.base_url = base_url.to_string();
        self.config.validate()?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> SearchResult<Self> {
        self.config.timeout_ms = timeout_ms;
        self.config.validate()?;
        self.http_client = HttpClient::with_timeout(timeout_ms)?;
        Ok(self)
    }

    pub fn with_default_param(mut self, name: &str, value: &str) -> Self {
        self.config
            .default_params
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_default_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.config.default_params.extend(params);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Explicitly configured application id
    pub fn app_id(&self) -> Option<&str> {
        self.config.app_id()
    }

    pub fn set_app_id(&mut self, app_id: Option<String>) {
        self.config.app_id = app_id;
    }

    /// Parameters sent with every query
    pub fn default_params(&self) -> &BTreeMap<String, String> {
        &self.config.default_params
    }

    pub fn default_params_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.config.default_params
    }

    /// Application id from the user's home directory, read once and cached
    pub fn user_app_id(&self) -> Option<&str> {
        self.user_app_id
            .get_or_init(config::read_user_app_id)
            .as_deref()
    }

    /// Drop the cached user application id and read it again
    pub fn reload_user_app_id(&mut self) -> Option<&str> {
        self.user_app_id = OnceLock::new();
        self.user_app_id()
    }

    fn resolve_app_id(&self) -> SearchResult<String> {
        self.app_id()
            .or_else(|| self.user_app_id())
            .map(str::to_string)
            .ok_or_else(|| {
                SearchError::ConfigError(format!(
                    "No Bing application id configured. Pass one to SearchClient::new or store it in ~/{}",
                    config::APP_ID_FILE
                ))
            })
    }

    /// Build the request for a search of `source`
    pub fn options_for(
        &self,
        source: Source,
        query: &str,
        options: &SearchOptions,
    ) -> SearchResult<SearchRequest> {
        Ok(SearchRequest {
            url: http::join_path(self.config.base_url(), source.as_str())?,
            query: query::assemble(&self.config.default_params, query, options),
            username: String::new(),
            password: self.resolve_app_id()?,
            http: options.http.clone(),
        })
    }

    /// Issue a search for `query` in `source`
    pub async fn search(
        &self,
        source: Source,
        query: &str,
        options: &SearchOptions,
    ) -> SearchResult<ResponseData> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidInput(
                "A search query is required".to_string(),
            ));
        }

        debug::log(
            &options.debug,
            "Performing search",
            &format!("source: {source}, query: {query}"),
        );

        let request = self.options_for(source, query, options)?;

        debug::log_request(
            &options.debug,
            "Bing search request",
            &http::build_url(&request.url, &request.query)?,
        );

        let body = self.http_client.send_search(&request).await?;
        let data = ResponseData::from_envelope(body)?;

        debug::log_response(
            &options.debug,
            &format!("Bing search returned {} results", data.results().len()),
        );

        Ok(data)
    }

    /// Search the web
    pub async fn web(&self, query: &str, options: &SearchOptions) -> SearchResult<ResponseData> {
        self.search(Source::Web, query, options).await
    }
}
