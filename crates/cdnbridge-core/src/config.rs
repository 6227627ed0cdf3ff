//! Configuration module
//!
//! Storage-provider settings read from the environment. Credentials are never
//! compiled in: the access key, zone and signing secret all come from here or
//! from per-call overrides supplied by the host.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_NAMESPACE, DEFAULT_REGION, DEFAULT_STORAGE_HOST,
    SIGNED_URL_TTL_SECS,
};

/// Connector configuration.
#[derive(Clone)]
pub struct Config {
    pub access_key: String,
    pub storage_zone: String,
    pub region: String,
    pub signing_secret: String,
    /// Public CDN host, e.g. `cdn.example.com`
    pub cdn_host: String,
    pub namespace: String,
    /// Replaces the region-derived storage endpoint (proxies, local test servers)
    pub storage_endpoint: Option<String>,
    pub http_timeout_secs: u64,
    pub url_ttl_secs: u64,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Config")
            .field("access_key", &redact(&self.access_key))
            .field("storage_zone", &self.storage_zone)
            .field("region", &self.region)
            .field("signing_secret", &redact(&self.signing_secret))
            .field("cdn_host", &self.cdn_host)
            .field("namespace", &self.namespace)
            .field("storage_endpoint", &self.storage_endpoint)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("url_ttl_secs", &self.url_ttl_secs)
            .finish()
    }
}

/// Access key from `BUNNY_API_KEY`, falling back to `BUNNY_ACCESS_KEY` when
/// the first is unset or blank.
fn access_key_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ["BUNNY_API_KEY", "BUNNY_ACCESS_KEY"]
        .into_iter()
        .filter_map(|name| lookup(name))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
        .unwrap_or_default()
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl Config {
    /// Build a config with defaults for everything but zone and CDN host.
    pub fn new(storage_zone: impl Into<String>, cdn_host: impl Into<String>) -> Self {
        Self {
            access_key: String::new(),
            storage_zone: storage_zone.into(),
            region: DEFAULT_REGION.to_string(),
            signing_secret: String::new(),
            cdn_host: cdn_host.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            storage_endpoint: None,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            url_ttl_secs: SIGNED_URL_TTL_SECS,
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let access_key = access_key_from(|name| env::var(name).ok());

        let storage_zone = env::var("BUNNY_STORAGE_ZONE")
            .map_err(|_| anyhow::anyhow!("BUNNY_STORAGE_ZONE must be set"))?;

        let cdn_host = env::var("BUNNY_CDN_HOST")
            .map_err(|_| anyhow::anyhow!("BUNNY_CDN_HOST must be set"))?;

        let config = Config {
            access_key,
            storage_zone,
            region: env::var("BUNNY_STORAGE_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            signing_secret: env::var("BUNNY_TOKEN_KEY").unwrap_or_default(),
            cdn_host,
            namespace: env::var("BUNNY_NAMESPACE")
                .unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string()),
            storage_endpoint: env::var("BUNNY_STORAGE_ENDPOINT")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            http_timeout_secs: env::var("BUNNY_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_HTTP_TIMEOUT_SECS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("BUNNY_HTTP_TIMEOUT_SECS must be a valid number"))?,
            url_ttl_secs: env::var("BUNNY_URL_TTL_SECS")
                .unwrap_or_else(|_| SIGNED_URL_TTL_SECS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("BUNNY_URL_TTL_SECS must be a valid number"))?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage_zone.trim().is_empty() {
            return Err(anyhow::anyhow!("Storage zone name must not be empty"));
        }
        if self.cdn_host.trim().is_empty() {
            return Err(anyhow::anyhow!("CDN host must not be empty"));
        }
        if self.namespace.trim_matches('/').trim().is_empty() {
            return Err(anyhow::anyhow!("Namespace must not be empty"));
        }
        if self.namespace.contains("..") {
            return Err(anyhow::anyhow!("Namespace must not contain '..'"));
        }
        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Override the access key when `access_key` is non-empty.
    pub fn with_access_key(mut self, access_key: &str) -> Self {
        if !access_key.trim().is_empty() {
            self.access_key = access_key.trim().to_string();
        }
        self
    }

    /// Override the signing secret when `secret` is non-empty.
    pub fn with_signing_secret(mut self, secret: &str) -> Self {
        if !secret.trim().is_empty() {
            self.signing_secret = secret.trim().to_string();
        }
        self
    }

    pub fn with_storage_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.storage_endpoint = Some(endpoint.into());
        self
    }

    /// `/{namespace}/`, the prefix every relative path hangs off.
    pub fn namespace_prefix(&self) -> String {
        format!("/{}/", self.namespace.trim_matches('/'))
    }

    /// Storage API root for this zone and namespace, always ending in `/`.
    ///
    /// Region `de` (or empty) uses the default host; any other region is
    /// prefixed onto it.
    pub fn storage_base_url(&self) -> String {
        let endpoint = match self.storage_endpoint {
            Some(ref endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => {
                let region = self.region.trim();
                if region.is_empty() || region == DEFAULT_REGION {
                    format!("https://{}", DEFAULT_STORAGE_HOST)
                } else {
                    format!("https://{}.{}", region, DEFAULT_STORAGE_HOST)
                }
            }
        };
        format!(
            "{}/{}{}",
            endpoint,
            self.storage_zone,
            self.namespace_prefix()
        )
    }

    /// Public CDN root for the namespace, always ending in `/`.
    pub fn cdn_base_url(&self) -> String {
        let host = self.cdn_host.trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };
        format!("{}{}", host, self.namespace_prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_region_uses_plain_storage_host() {
        let config = Config::new("zone", "cdn.example.com");
        assert_eq!(
            config.storage_base_url(),
            "https://storage.bunnycdn.com/zone/ai-talking-videos/"
        );

        let mut empty = config.clone();
        empty.region = String::new();
        assert_eq!(empty.storage_base_url(), config.storage_base_url());
    }

    #[test]
    fn other_regions_are_prefixed_onto_host() {
        let mut config = Config::new("zone", "cdn.example.com");
        config.region = "sg".to_string();
        assert_eq!(
            config.storage_base_url(),
            "https://sg.storage.bunnycdn.com/zone/ai-talking-videos/"
        );
    }

    #[test]
    fn endpoint_override_wins_over_region() {
        let mut config =
            Config::new("zone", "cdn.example.com").with_storage_endpoint("http://127.0.0.1:9000/");
        config.region = "ny".to_string();
        assert_eq!(
            config.storage_base_url(),
            "http://127.0.0.1:9000/zone/ai-talking-videos/"
        );
    }

    #[test]
    fn cdn_base_url_adds_scheme_and_namespace() {
        let config = Config::new("zone", "cdn.example.com");
        assert_eq!(
            config.cdn_base_url(),
            "https://cdn.example.com/ai-talking-videos/"
        );

        let explicit = Config::new("zone", "http://localhost:8080/");
        assert_eq!(
            explicit.cdn_base_url(),
            "http://localhost:8080/ai-talking-videos/"
        );
    }

    #[test]
    fn overrides_ignore_blank_values() {
        let mut config = Config::new("zone", "cdn.example.com");
        config.access_key = "from-env".to_string();
        let config = config.with_access_key("  ").with_signing_secret("secret");
        assert_eq!(config.access_key, "from-env");
        assert_eq!(config.signing_secret, "secret");
    }

    #[test]
    fn debug_redacts_credentials() {
        let config = Config::new("zone", "cdn.example.com")
            .with_access_key("key-123")
            .with_signing_secret("secret-456");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("key-123"));
        assert!(!rendered.contains("secret-456"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn blank_api_key_falls_back_to_access_key() {
        let lookup = |name: &str| match name {
            "BUNNY_API_KEY" => Some(String::new()),
            "BUNNY_ACCESS_KEY" => Some("real-key".to_string()),
            _ => None,
        };
        assert_eq!(access_key_from(lookup), "real-key");

        let lookup = |name: &str| match name {
            "BUNNY_API_KEY" => Some("primary".to_string()),
            "BUNNY_ACCESS_KEY" => Some("real-key".to_string()),
            _ => None,
        };
        assert_eq!(access_key_from(lookup), "primary");

        assert_eq!(access_key_from(|_| None), "");
    }

    #[test]
    fn validate_rejects_blank_namespace() {
        let mut config = Config::new("zone", "cdn.example.com");
        for namespace in ["", "  ", "/", "//"] {
            config.namespace = namespace.to_string();
            assert!(config.validate().is_err(), "{:?} accepted", namespace);
        }
        config.namespace = "videos".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_zone() {
        let config = Config::new(" ", "cdn.example.com");
        assert!(config.validate().is_err());
    }
}
