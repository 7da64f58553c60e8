//! Plain HTTP GET client shared by the sitemap and page fetchers.

use crate::error::FetchError;
use std::time::Duration;
use tracing::debug;

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("sitemap-census/", env!("CARGO_PKG_VERSION"));

/// Client settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Per-request timeout. `None` leaves reqwest's default (no timeout).
    pub timeout: Option<Duration>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

/// Response to a GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin wrapper over `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Issue a GET and read the whole body, whatever the status.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().await.map_err(transport)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(transport)?;
        debug!(url, status, bytes = body.len(), "fetched");

        Ok(HttpResponse {
            url: url.to_string(),
            status,
            body,
        })
    }

    /// Issue a GET and return the body, failing on any non-2xx status.
    pub async fn get_ok(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.get(url).await?;
        if !resp.is_success() {
            return Err(FetchError::Status {
                url: resp.url,
                status: resp.status,
            });
        }
        Ok(resp.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_is_success_range() {
        let mut resp = HttpResponse {
            url: "https://example.com/".to_string(),
            status: 200,
            body: String::new(),
        };
        assert!(resp.is_success());
        resp.status = 204;
        assert!(resp.is_success());
        resp.status = 301;
        assert!(!resp.is_success());
        resp.status = 404;
        assert!(!resp.is_success());
    }

    #[tokio::test]
    async fn test_get_ok_returns_body_and_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new(&HttpConfig::default()).unwrap();
        let body = client.get_ok(&format!("{}/page", server.uri())).await.unwrap();
        assert_eq!(body, "<html></html>");
    }

    #[tokio::test]
    async fn test_get_ok_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        let client = HttpClient::new(&HttpConfig::default()).unwrap();
        let url = format!("{}/gone", server.uri());

        // `get` still hands back the response
        let resp = client.get(&url).await.unwrap();
        assert_eq!(resp.status, 410);

        match client.get_ok(&url).await {
            Err(FetchError::Status { url: u, status }) => {
                assert_eq!(u, url);
                assert_eq!(status, 410);
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_invalid_url_is_transport_error() {
        let client = HttpClient::new(&HttpConfig::default()).unwrap();
        let err = client.get("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.url(), "not a url");
    }
}
