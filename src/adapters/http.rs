use crate::config::AppConfig;
use crate::domain::model::FetchResult;
use crate::domain::ports::PageFetcher;
use crate::utils::error::{CauseListError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;

/// reqwest-backed fetcher. The priming request and the real request share one
/// client, so cookies handed out by the site root ride along on the second call.
pub struct HttpFetcher {
    client: Client,
    site_root: String,
    prime_timeout: Duration,
    fetch_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers(build_headers(&config.headers)?)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            site_root: config.site_root.clone(),
            prime_timeout: config.prime_timeout(),
            fetch_timeout: config.fetch_timeout(),
        })
    }
}

pub fn build_headers(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            CauseListError::InvalidConfigValueError {
                field: "headers".to_string(),
                value: name.clone(),
                reason: format!("Invalid header name: {}", e),
            }
        })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|e| CauseListError::InvalidConfigValueError {
                field: format!("headers.{}", name),
                value: value.clone(),
                reason: format!("Invalid header value: {}", e),
            })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn prime(&self) {
        // Failures here are expected on some networks and never reported.
        let result = self
            .client
            .get(&self.site_root)
            .timeout(self.prime_timeout)
            .send()
            .await;

        match result {
            Ok(response) => {
                tracing::debug!("Priming request returned {}", response.status());
                let _ = response.bytes().await;
            }
            Err(e) => tracing::debug!("Priming request skipped: {}", e),
        }
    }

    async fn fetch(&self, url: &str) -> Result<FetchResult> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .timeout(self.fetch_timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!("Response status: {}", status);
        let body = response.text().await?;

        Ok(FetchResult { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config_for(server: &MockServer) -> AppConfig {
        AppConfig {
            site_root: server.url("/"),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/list")
                .header("Referer", "https://services.ecourts.gov.in/")
                .header("Accept-Language", "en-US,en;q=0.9")
                .header_exists("User-Agent");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<html><body>Cause list</body></html>");
        });

        let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
        let result = fetcher.fetch(&server.url("/list")).await.unwrap();

        page_mock.assert();
        assert_eq!(result.status, 200);
        assert!(result.body.contains("Cause list"));
    }

    #[tokio::test]
    async fn test_fetch_returns_non_200_status_without_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/list");
            then.status(503).body("down for maintenance");
        });

        let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
        let result = fetcher.fetch(&server.url("/list")).await.unwrap();

        assert_eq!(result.status, 503);
        assert!(!result.is_ok());
    }

    #[tokio::test]
    async fn test_prime_cookie_is_sent_with_fetch() {
        let server = MockServer::start();
        let root_mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200).header("Set-Cookie", "SESSION=abc123; Path=/");
        });
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/list").cookie("SESSION", "abc123");
            then.status(200).body("<html>ok</html>");
        });

        let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
        fetcher.prime().await;
        let result = fetcher.fetch(&server.url("/list")).await.unwrap();

        root_mock.assert();
        page_mock.assert();
        assert_eq!(result.status, 200);
    }

    #[tokio::test]
    async fn test_prime_failure_is_swallowed() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/list");
            then.status(200).body("<html>ok</html>");
        });

        let config = AppConfig {
            // Nothing listens on port 1.
            site_root: "http://127.0.0.1:1/".to_string(),
            ..AppConfig::default()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        fetcher.prime().await;
        let result = fetcher.fetch(&server.url("/list")).await.unwrap();

        page_mock.assert();
        assert_eq!(result.status, 200);
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_error() {
        let fetcher = HttpFetcher::new(&AppConfig::default()).unwrap();
        let err = fetcher.fetch("http://127.0.0.1:1/list").await.unwrap_err();
        assert!(matches!(err, CauseListError::FetchError(_)));
    }

    #[test]
    fn test_build_headers_rejects_bad_names() {
        let mut headers = BTreeMap::new();
        headers.insert("Bad Header".to_string(), "x".to_string());
        assert!(build_headers(&headers).is_err());
    }
}
