//! Server key retrieval from a hosted JSON resource

use crate::config::ExtractorConfig;
use crate::error::VsrcError;
use crate::extract::retry::{RetryConfig, RetryExecutor};
use crate::utils::cache::{new_async_cache, AsyncCache};
use crate::Result;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Supplies the slow-changing server key
#[async_trait::async_trait]
pub trait RemoteKeyFetcher: Send + Sync {
    /// Current server key
    async fn fetch_key(&self) -> Result<String>;

    /// Forget any cached key so the next fetch goes to the source
    async fn invalidate(&self) {}
}

/// Fixed server key, for callers that obtain it some other way
#[derive(Debug, Clone)]
pub struct StaticKeyFetcher {
    key: String,
}

impl StaticKeyFetcher {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self { key: key.into() }
    }
}

#[async_trait::async_trait]
impl RemoteKeyFetcher for StaticKeyFetcher {
    async fn fetch_key(&self) -> Result<String> {
        if self.key.is_empty() {
            return Err(VsrcError::EmptyInput("server key".to_string()));
        }
        Ok(self.key.clone())
    }
}

/// Fetches one string field of a hosted JSON document and caches it
pub struct HttpKeyFetcher {
    http_client: Client,
    url: String,
    field: String,
    cache: AsyncCache<String, String>,
    retry: RetryExecutor,
}

impl HttpKeyFetcher {
    /// Create a fetcher from configuration; `server_key_url` must be set
    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        config.validate()?;
        let url = config
            .server_key_url
            .clone()
            .ok_or_else(|| VsrcError::Config("server_key_url is not set".to_string()))?;

        let http_client = Client::builder().timeout(config.request_timeout).build()?;
        let retry = RetryExecutor::with_config(RetryConfig {
            max_retries: config.max_retries,
            ..RetryConfig::default()
        });

        Ok(Self {
            http_client,
            url,
            field: config.server_key_field.clone(),
            cache: new_async_cache(config.server_key_ttl),
            retry,
        })
    }

    /// Create a fetcher for `url` with default settings
    pub fn new<S: Into<String>>(url: S) -> Result<Self> {
        Self::from_config(&ExtractorConfig::new().with_server_key_url(url))
    }

    async fn fetch_remote(&self) -> Result<String> {
        let http_client = self.http_client.clone();
        let url = self.url.clone();
        let field = self.field.clone();

        self.retry
            .execute(move || {
                let http_client = http_client.clone();
                let url = url.clone();
                let field = field.clone();
                Box::pin(async move { fetch_field(&http_client, &url, &field).await })
            })
            .await
    }
}

#[async_trait::async_trait]
impl RemoteKeyFetcher for HttpKeyFetcher {
    async fn fetch_key(&self) -> Result<String> {
        if let Some(cached) = self.cache.get(&self.url).await {
            debug!("Server key cache hit");
            return Ok(cached);
        }

        let key = self.fetch_remote().await?;
        debug!("Fetched server key from {}", self.url);
        self.cache.insert(self.url.clone(), key.clone()).await;
        Ok(key)
    }

    async fn invalidate(&self) {
        self.cache.invalidate(&self.url).await;
    }
}

async fn fetch_field(http_client: &Client, url: &str, field: &str) -> Result<String> {
    let body: Value = http_client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    lookup_field(&body, field)
}

/// Read a string at a dotted path, e.g. `keys.mega`
fn lookup_field(body: &Value, field: &str) -> Result<String> {
    field
        .split('.')
        .try_fold(body, |value, segment| value.get(segment))
        .and_then(Value::as_str)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or_else(|| VsrcError::KeyNotFound(format!("field {:?} in server key resource", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn fetcher_for(server: &mockito::Server, path: &str, field: &str, max_retries: u32) -> HttpKeyFetcher {
        let config = ExtractorConfig::new()
            .with_server_key_url(format!("{}{}", server.url(), path))
            .with_server_key_field(field)
            .with_request_timeout(Duration::from_secs(5))
            .with_max_retries(max_retries);
        HttpKeyFetcher::from_config(&config).unwrap()
    }

    #[test]
    fn test_lookup_field() {
        let body = json!({"key": "top", "keys": {"mega": "nested", "empty": ""}});
        assert_eq!(lookup_field(&body, "key").unwrap(), "top");
        assert_eq!(lookup_field(&body, "keys.mega").unwrap(), "nested");
        assert!(matches!(lookup_field(&body, "keys.empty"), Err(VsrcError::KeyNotFound(_))));
        assert!(matches!(lookup_field(&body, "missing"), Err(VsrcError::KeyNotFound(_))));
        assert!(matches!(lookup_field(&body, "keys"), Err(VsrcError::KeyNotFound(_))));
    }

    #[test]
    fn test_from_config_requires_url() {
        assert!(matches!(
            HttpKeyFetcher::from_config(&ExtractorConfig::default()),
            Err(VsrcError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_static_fetcher() {
        assert_eq!(StaticKeyFetcher::new("abc").fetch_key().await.unwrap(), "abc");
        assert!(matches!(
            StaticKeyFetcher::new("").fetch_key().await,
            Err(VsrcError::EmptyInput(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_and_cache() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/keys.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"mega": "serverKeyTest", "other": "x"}"#)
            .expect(1)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server, "/keys.json", "mega", 0);
        assert_eq!(fetcher.fetch_key().await.unwrap(), "serverKeyTest");
        assert_eq!(fetcher.fetch_key().await.unwrap(), "serverKeyTest");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalidate_refetches() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/keys.json")
            .with_status(200)
            .with_body(r#"{"key": "k1"}"#)
            .expect(2)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server, "/keys.json", "key", 0);
        fetcher.fetch_key().await.unwrap();
        fetcher.invalidate().await;
        fetcher.fetch_key().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_field() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/keys.json")
            .with_status(200)
            .with_body(r#"{"other": "x"}"#)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server, "/keys.json", "key", 0);
        assert!(matches!(fetcher.fetch_key().await, Err(VsrcError::KeyNotFound(_))));
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/keys.json")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server, "/keys.json", "key", 2);
        let result = fetcher.fetch_key().await;
        assert!(matches!(result, Err(VsrcError::Http(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/keys.json")
            .with_status(503)
            .expect(2)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server, "/keys.json", "key", 1);
        assert!(fetcher.fetch_key().await.is_err());
        mock.assert_async().await;
    }
}
