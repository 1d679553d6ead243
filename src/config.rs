//! Configuration for the extraction layer

use crate::error::VsrcError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Extraction layer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Hosted JSON resource holding the server key
    pub server_key_url: Option<String>,
    /// Field of that resource holding the key, dots separate nested objects
    pub server_key_field: String,
    /// How long a fetched server key is trusted
    #[serde(with = "duration_secs")]
    pub server_key_ttl: Duration,
    /// HTTP request timeout
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
    /// Retries for transient server key fetch failures
    pub max_retries: u32,
    /// Maximum number of cached master keys
    pub master_key_cache_capacity: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            server_key_url: None,
            server_key_field: "key".to_string(),
            server_key_ttl: Duration::from_secs(3600), // 1 hour
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            master_key_cache_capacity: 256,
        }
    }
}

impl ExtractorConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server key resource
    pub fn with_server_key_url<S: Into<String>>(mut self, url: S) -> Self {
        self.server_key_url = Some(url.into());
        self
    }

    /// Set the server key field
    pub fn with_server_key_field<S: Into<String>>(mut self, field: S) -> Self {
        self.server_key_field = field.into();
        self
    }

    /// Set the server key TTL
    pub fn with_server_key_ttl(mut self, ttl: Duration) -> Self {
        self.server_key_ttl = ttl;
        self
    }

    /// Set the HTTP request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the retry count
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the master key cache capacity
    pub fn with_master_key_cache_capacity(mut self, capacity: u64) -> Self {
        self.master_key_cache_capacity = capacity;
        self
    }

    /// Check the configuration for values that cannot work
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.server_key_url {
            let parsed = Url::parse(url)?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(VsrcError::Config(format!(
                    "unsupported server key URL scheme: {}",
                    parsed.scheme()
                )));
            }
        }
        if self.server_key_field.split('.').any(str::is_empty) {
            return Err(VsrcError::Config(format!(
                "invalid server key field: {:?}",
                self.server_key_field
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(VsrcError::Config("request timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractorConfig::default();
        assert_eq!(config.server_key_url, None);
        assert_eq!(config.server_key_field, "key");
        assert_eq!(config.server_key_ttl, Duration::from_secs(3600));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.master_key_cache_capacity, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ExtractorConfig::new()
            .with_server_key_url("https://keys.example/e1.json")
            .with_server_key_field("mega")
            .with_server_key_ttl(Duration::from_secs(60))
            .with_request_timeout(Duration::from_secs(5))
            .with_max_retries(1)
            .with_master_key_cache_capacity(8);

        assert_eq!(config.server_key_url.as_deref(), Some("https://keys.example/e1.json"));
        assert_eq!(config.server_key_field, "mega");
        assert_eq!(config.max_retries, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ExtractorConfig = serde_json::from_str(
            r#"{"server_key_url": "https://keys.example/k.json", "server_key_ttl": 120}"#,
        )
        .unwrap();
        assert_eq!(config.server_key_ttl, Duration::from_secs(120));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.server_key_field, "key");
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = ExtractorConfig::new().with_server_key_ttl(Duration::from_secs(90));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""server_key_ttl":90"#));
        assert_eq!(serde_json::from_str::<ExtractorConfig>(&json).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            ExtractorConfig::new().with_server_key_url("not a url").validate(),
            Err(VsrcError::Url(_))
        ));
        assert!(matches!(
            ExtractorConfig::new().with_server_key_url("ftp://keys.example/k").validate(),
            Err(VsrcError::Config(_))
        ));
        assert!(matches!(
            ExtractorConfig::new().with_server_key_field("").validate(),
            Err(VsrcError::Config(_))
        ));
        assert!(matches!(
            ExtractorConfig::new().with_server_key_field("keys..mega").validate(),
            Err(VsrcError::Config(_))
        ));
        assert!(matches!(
            ExtractorConfig::new().with_request_timeout(Duration::ZERO).validate(),
            Err(VsrcError::Config(_))
        ));
    }
}
