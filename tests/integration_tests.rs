//! Integration tests for the search client
//!
//! These tests run the client against a mock server and cover request
//! signing, parameter assembly, response wrapping and error reporting.

use serde_json::json;
use bingsearch::{
    error::SearchError,
    types::{QueryKeyword, SearchOptions, Source},
    utils::debug,
    ClientConfig, SearchClient,
};
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

// base64(":secret-app-id")
const AUTH_HEADER: &str = "Basic OnNlY3JldC1hcHAtaWQ=";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

async fn setup() -> (MockServer, SearchClient) {
    init_logging();
    let mock_server = MockServer::start().await;
    let client = SearchClient::with_config(ClientConfig {
        app_id: Some("secret-app-id".to_string()),
        base_url: format!("{}/Bing/SearchWeb/v1", mock_server.uri()),
        ..Default::default()
    })
    .unwrap();
    (mock_server, client)
}

fn web_response() -> serde_json::Value {
    json!({
        "d": {
            "results": [
                {
                    "__metadata": {
                        "uri": "https://api.datamarket.azure.com/Data.ashx/Bing/SearchWeb/v1/Web?Query='ruby'&$skip=10&$top=1",
                        "type": "WebResult"
                    },
                    "ID": "8d5a6c1e-0000-4c4e-9f5e-000000000001",
                    "Title": "Ruby (programming language) - Wikipedia, the free encyclopedia",
                    "Description": "Ruby is a dynamic, reflective, object-oriented, general-purpose programming language.",
                    "DisplayUrl": "en.wikipedia.org/wiki/Ruby_(programming_language)",
                    "Url": "https://en.wikipedia.org/wiki/Ruby_(programming_language)"
                },
                {
                    "__metadata": {"uri": "https://example.invalid/2", "type": "WebResult"},
                    "ID": "8d5a6c1e-0000-4c4e-9f5e-000000000002",
                    "Title": "vim-ruby",
                    "Description": "Vim/Ruby Configuration Files",
                    "DisplayUrl": "github.com/vim-ruby/vim-ruby",
                    "Url": "http://github.com/vim-ruby/vim-ruby/tree/master"
                }
            ],
            "__next": "https://api.datamarket.azure.com/Data.ashx/Bing/SearchWeb/v1/Web?Query='ruby'&$skip=12"
        }
    })
}

#[tokio::test]
async fn test_web_search_success() {
    let (mock_server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/Bing/SearchWeb/v1/Web"))
        .and(header("authorization", AUTH_HEADER))
        .and(query_param("Query", "'ruby'"))
        .and(query_param("$top", "10"))
        .and(query_param("$skip", "10"))
        .and(query_param("$format", "JSON"))
        .respond_with(ResponseTemplate::new(200).set_body_json(web_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = SearchOptions::new().top(10).skip(10);
    let response = client.web("ruby", &options).await.unwrap();

    let results = response.results();
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0].get("title").and_then(|v| v.as_str()),
        Some("Ruby (programming language) - Wikipedia, the free encyclopedia")
    );
    assert_eq!(
        response.lookup("results.1.url").and_then(|v| v.as_str()),
        Some("http://github.com/vim-ruby/vim-ruby/tree/master")
    );
    assert_eq!(
        response
            .lookup("results.0.metadata.type")
            .and_then(|v| v.as_str()),
        Some("WebResult")
    );

    let hits = response.web_results();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[1].domain.as_deref(), Some("github.com"));
    assert_eq!(
        hits[0].display_url.as_deref(),
        Some("en.wikipedia.org/wiki/Ruby_(programming_language)")
    );
}

#[tokio::test]
async fn test_search_with_keyword_filters() {
    let (mock_server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/Bing/SearchWeb/v1/Web"))
        .and(query_param("site", "(site:github.com OR site:rubyforge.org)"))
        .and(query_param("filetype", "pdf"))
        .and(query_param("Market", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(web_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = SearchOptions::new()
        .filter(QueryKeyword::Site, vec!["github.com", "rubyforge.org"])
        .filter(QueryKeyword::Filetype, "pdf")
        .param("Market", "en-US");

    let response = client.search(Source::Web, "ruby", &options).await.unwrap();
    assert_eq!(response.results().len(), 2);
}

#[tokio::test]
async fn test_default_params_and_base_options() {
    let (mock_server, client) = setup().await;
    let client = client.with_default_param("Adult", "Strict");

    Mock::given(method("GET"))
        .and(path("/Bing/SearchWeb/v1/Web"))
        .and(header("x-request-tag", "integration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(web_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = SearchOptions::new()
        .param("market", "de-DE")
        .param("appid", "leak")
        .param("$format", "XML")
        .header("X-Request-Tag", "integration");

    client.web("ruby", &options).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let pairs: Vec<(String, String)> = requests[0].url.query_pairs().into_owned().collect();
    let value = |name: &str| {
        pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };

    assert_eq!(value("Adult"), Some("Strict"));
    assert_eq!(value("$format"), Some("JSON"));
    assert_eq!(value("Query"), Some("'ruby'"));
    assert_eq!(value("market"), None);
    assert_eq!(value("appid"), None);
}

#[tokio::test]
async fn test_non_200_status_returns_api_error_with_dumps() {
    let (mock_server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/Bing/SearchWeb/v1/Web"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("The authorization type you provided is not supported."),
        )
        .mount(&mock_server)
        .await;

    let error = client
        .web("ruby", &SearchOptions::default())
        .await
        .unwrap_err();

    match &error {
        SearchError::ApiError {
            status_code,
            request,
            response,
        } => {
            assert_eq!(*status_code, 401);
            assert!(request.contains("method: GET"));
            assert!(request.contains("/Bing/SearchWeb/v1/Web"));
            assert!(!request.contains("OnNlY3JldC1hcHAtaWQ="));
            assert!(response.contains("status: 401"));
            assert!(response.contains("authorization type you provided"));
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }

    assert!(bingsearch::troubleshooting_info(&error).contains("authentication issue"));
}

#[tokio::test]
async fn test_other_success_codes_are_errors() {
    let (mock_server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let result = client.web("ruby", &SearchOptions::default()).await;
    assert!(matches!(
        result,
        Err(SearchError::ApiError {
            status_code: 204,
            ..
        })
    ));
}

#[tokio::test]
async fn test_missing_envelope_is_parse_error() {
    let (mock_server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&mock_server)
        .await;

    let result = client.web("ruby", &SearchOptions::default()).await;
    assert!(matches!(result, Err(SearchError::ParseError(_))));
}

#[tokio::test]
async fn test_invalid_json_is_parse_error() {
    let (mock_server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let result = client.web("ruby", &SearchOptions::default()).await;
    assert!(matches!(result, Err(SearchError::ParseError(_))));
}

#[tokio::test]
async fn test_request_timeout() {
    let (mock_server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(web_response())
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let options = SearchOptions::new().timeout(50).debug(debug::debug_all());
    match client.web("ruby", &options).await {
        Err(SearchError::Timeout { timeout_ms }) => assert_eq!(timeout_ms, 50),
        other => panic!("Expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_failure_is_http_error() {
    init_logging();
    let client = SearchClient::new("secret-app-id")
        .unwrap()
        .with_base_url("http://127.0.0.1:9/v1")
        .unwrap();

    let result = client.web("ruby", &SearchOptions::default()).await;
    assert!(matches!(
        result,
        Err(SearchError::HttpError {
            status_code: None,
            ..
        })
    ));
}
