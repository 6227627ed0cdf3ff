//! Signed CDN URLs.
//!
//! Token = base64url_nopad(MD5(secret || "/{namespace}/" || path || expires)).
//! URL   = {cdn_base}{path}?token={token}&expires={expires}
//!
//! The provider recomputes the same digest to authorize the request, so the
//! hash input order and encoding are a wire contract.

use base64::Engine;
use cdnbridge_core::Config;
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::traits::{StorageError, StorageResult};

/// Token and expiry for one signed URL. Computed per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrlToken {
    /// Unix seconds
    pub expires: i64,
    pub token: String,
}

#[derive(Clone)]
pub struct UrlSigner {
    secret: String,
    namespace_prefix: String,
    cdn_base: String,
    ttl_secs: u64,
}

impl Debug for UrlSigner {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("UrlSigner")
            .field("namespace_prefix", &self.namespace_prefix)
            .field("cdn_base", &self.cdn_base)
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl UrlSigner {
    /// `namespace_prefix` is hashed verbatim (e.g. `/ai-talking-videos/`);
    /// `cdn_base` must end with `/`.
    pub fn new(
        secret: impl Into<String>,
        namespace_prefix: impl Into<String>,
        cdn_base: impl Into<String>,
        ttl_secs: u64,
    ) -> Self {
        Self {
            secret: secret.into(),
            namespace_prefix: namespace_prefix.into(),
            cdn_base: cdn_base.into(),
            ttl_secs,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.signing_secret.clone(),
            config.namespace_prefix(),
            config.cdn_base_url(),
            config.url_ttl_secs,
        )
    }

    pub fn has_secret(&self) -> bool {
        !self.secret.is_empty()
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Token for `path` expiring at `expires` (unix seconds).
    pub fn token(&self, path: &str, expires: i64) -> SignedUrlToken {
        let mut hasher = Md5::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(self.namespace_prefix.as_bytes());
        hasher.update(path.as_bytes());
        hasher.update(expires.to_string().as_bytes());
        let digest = hasher.finalize();

        SignedUrlToken {
            expires,
            token: base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest),
        }
    }

    /// Signed URL valid for the configured window starting at `now`.
    pub fn sign_at(&self, path: &str, now: DateTime<Utc>) -> StorageResult<String> {
        if !self.has_secret() {
            return Err(StorageError::Signing(
                "no URL signing secret configured".to_string(),
            ));
        }
        let expires = now.timestamp() + self.ttl_secs as i64;
        let signed = self.token(path, expires);
        Ok(format!(
            "{}{}?token={}&expires={}",
            self.cdn_base, path, signed.token, signed.expires
        ))
    }

    pub fn sign(&self, path: &str) -> StorageResult<String> {
        self.sign_at(path, Utc::now())
    }

    /// Unsigned public URL for `path`.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.cdn_base, path)
    }
}
