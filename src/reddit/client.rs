use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::types::Listing;

/// Errors that can occur while fetching a listing.
///
/// Any of these fails the whole request; there is no partial feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the configured size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body was not a listing document
    #[error("Invalid listing JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Builds the shared HTTP client used for upstream fetches.
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Fetches and decodes one listing.
///
/// One attempt only: the caller turns any error into a failed response.
pub async fn fetch_listing(
    client: &reqwest::Client,
    url: &Url,
    timeout: Duration,
    max_bytes: usize,
) -> Result<Listing, FetchError> {
    tracing::debug!(url = %url, "Fetching listing");

    let response = tokio::time::timeout(timeout, client.get(url.as_str()).send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        tracing::warn!(url = %url, status = %response.status(), "Listing request failed");
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = tokio::time::timeout(timeout, read_limited_bytes(response, max_bytes))
        .await
        .map_err(|_| FetchError::Timeout)??;

    let listing: Listing = serde_json::from_slice(&bytes)?;
    tracing::debug!(
        url = %url,
        children = listing.data.children.len(),
        "Listing decoded"
    );
    Ok(listing)
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LISTING: &str = r#"{"data": {"children": [
        {"data": {"title": "First", "score": 3}},
        {"data": {"title": "Second", "score": 1}}
    ]}}"#;

    const TIMEOUT: Duration = Duration::from_secs(5);
    const LIMIT: usize = 1024 * 1024;

    fn url(server: &MockServer, route: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), route)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_listing_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/r/rust/hot.json"))
            .and(query_param("limit", "50"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(LISTING)
                    .insert_header("Content-Type", "application/json"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = build_client().unwrap();
        let listing = fetch_listing(
            &client,
            &url(&mock_server, "/r/rust/hot.json?limit=50"),
            TIMEOUT,
            LIMIT,
        )
        .await
        .unwrap();

        let titles: Vec<String> = listing.into_posts().filter_map(|p| p.title).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_fetch_listing_http_error_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = build_client().unwrap();
        let err = fetch_listing(&client, &url(&mock_server, "/r/x/hot.json"), TIMEOUT, LIMIT)
            .await
            .unwrap_err();
        match err {
            FetchError::HttpStatus(503) => {}
            e => panic!("Expected HttpStatus(503), got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_fetch_listing_non_json_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
            .mount(&mock_server)
            .await;

        let client = build_client().unwrap();
        let err = fetch_listing(&client, &url(&mock_server, "/r/x/hot.json"), TIMEOUT, LIMIT)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_fetch_listing_too_large() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
            .mount(&mock_server)
            .await;

        let client = build_client().unwrap();
        let err = fetch_listing(&client, &url(&mock_server, "/r/x/hot.json"), TIMEOUT, 16)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::ResponseTooLarge), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_fetch_listing_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(LISTING)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let client = build_client().unwrap();
        let err = fetch_listing(
            &client,
            &url(&mock_server, "/r/x/hot.json"),
            Duration::from_millis(50),
            LIMIT,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FetchError::Timeout), "got {:?}", err);
    }
}
