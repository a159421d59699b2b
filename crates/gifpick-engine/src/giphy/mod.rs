//! Giphy HTTP backend.
//!
//! Two endpoints are used, both GET with the API key as a query parameter:
//! - `{endpoint}trending` for the default result set
//! - `{endpoint}search?q=...` for keyword searches

mod request;
mod response;

use std::error::Error as _;
use std::time::Duration;

use futures::future::{self, BoxFuture};
use gifpick_core::{PickerConfig, Query, SearchError};
use url::Url;

use crate::backend::{SearchBackend, SearchOutcome};

pub use request::Endpoints;
pub use response::{decode_results, error_message};

const USER_AGENT: &str = concat!("gifpick/", env!("CARGO_PKG_VERSION"));

/// Real backend talking to the Giphy REST API.
pub struct GiphyBackend {
    client: reqwest::Client,
    endpoints: Endpoints,
    timeout: Duration,
}

impl GiphyBackend {
    /// Create a backend with its own HTTP client.
    pub fn new(config: &PickerConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(transport_error)?;
        Ok(Self::with_client(config, client))
    }

    /// Create a backend sharing an existing HTTP client.
    pub fn with_client(config: &PickerConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            endpoints: Endpoints::from_config(config),
            timeout: config.timeout,
        }
    }

    /// Create with a custom timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl SearchBackend for GiphyBackend {
    fn search(&self, query: Query) -> BoxFuture<'static, SearchOutcome> {
        let url = match self.endpoints.url_for(&query) {
            Ok(url) => url,
            Err(e) => return Box::pin(future::ready(Err(e))),
        };
        let client = self.client.clone();
        let timeout = self.timeout;

        Box::pin(async move {
            match tokio::time::timeout(timeout, fetch(client, url)).await {
                Ok(result) => result,
                Err(_) => Err(SearchError::Timeout { duration: timeout }),
            }
        })
    }
}

async fn fetch(client: reqwest::Client, url: Url) -> SearchOutcome {
    let response = client.get(url).send().await.map_err(transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(SearchError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    decode_results(&body)
}

/// Flatten a reqwest error chain. The URL is stripped because it carries the API key.
fn transport_error(error: reqwest::Error) -> SearchError {
    let error = error.without_url();
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    SearchError::Transport(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve one canned HTTP response; the handle yields the request head.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/v1/gifs/", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let head = read_head(&mut stream);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            head
        });

        (endpoint, handle)
    }

    fn read_head(stream: &mut std::net::TcpStream) -> String {
        let mut head = Vec::new();
        let mut byte = [0u8; 1];
        while !head.ends_with(b"\r\n\r\n") {
            if stream.read(&mut byte).unwrap() == 0 {
                break;
            }
            head.push(byte[0]);
        }
        String::from_utf8_lossy(&head).into_owned()
    }

    fn backend(endpoint: &str) -> GiphyBackend {
        let config = PickerConfig::new("SECRET")
            .unwrap()
            .with_endpoint(endpoint)
            .unwrap();
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        GiphyBackend::with_client(&config, client)
    }

    #[tokio::test]
    async fn test_search_success() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"data": [{"images": {"fixed_width": {"url": "a.gif"}}}], "meta": {"status": 200}}"#,
        );

        let results = backend(&endpoint)
            .search(Query::Search("cat".into()))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].thumbnail_url(), "a.gif");

        let head = server.join().unwrap();
        assert!(
            head.starts_with("GET /v1/gifs/search?api_key=SECRET&q=cat HTTP/1.1"),
            "{head}"
        );
    }

    #[tokio::test]
    async fn test_trending_hits_trending_endpoint() {
        let (endpoint, server) = serve_once("200 OK", r#"{"data": []}"#);

        let results = backend(&endpoint).search(Query::Trending).await.unwrap();
        assert!(results.is_empty());

        let head = server.join().unwrap();
        assert!(head.starts_with("GET /v1/gifs/trending?api_key=SECRET "), "{head}");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let (endpoint, server) = serve_once(
            "403 Forbidden",
            r#"{"meta": {"status": 403, "msg": "Forbidden"}}"#,
        );

        let error = backend(&endpoint)
            .search(Query::Trending)
            .await
            .unwrap_err();
        assert_eq!(
            error,
            SearchError::Status {
                status: 403,
                message: Some("Forbidden".to_string())
            }
        );
        server.join().unwrap();
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (endpoint, server) = serve_once("200 OK", r#"{"data": [{"images": {}}]}"#);

        let error = backend(&endpoint)
            .search(Query::Trending)
            .await
            .unwrap_err();
        assert!(matches!(error, SearchError::Malformed(_)));
        server.join().unwrap();
    }

    #[tokio::test]
    async fn test_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/v1/gifs/", listener.local_addr().unwrap());
        // Accept and never answer
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                read_head(&mut stream);
                thread::sleep(Duration::from_secs(2));
            }
        });

        let timeout = Duration::from_millis(100);
        let error = backend(&endpoint)
            .with_timeout(timeout)
            .search(Query::Trending)
            .await
            .unwrap_err();
        assert_eq!(error, SearchError::Timeout { duration: timeout });
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/v1/gifs/", listener.local_addr().unwrap());
        drop(listener);

        let error = backend(&endpoint)
            .search(Query::Trending)
            .await
            .unwrap_err();
        match error {
            SearchError::Transport(message) => assert!(!message.contains("SECRET"), "{message}"),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
