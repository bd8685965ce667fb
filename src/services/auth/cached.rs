use std::sync::Arc;

use async_trait::async_trait;
use axum::http::request::Parts;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::api::v1::extractors::{AuthMethod, Principal};
use crate::services::auth::{AuthError, Authenticator, bearer_token};
use crate::services::cache::{CacheClient, ValkeyClient};

pub const DEFAULT_PREFIX: &str = "oauth2:access_token";

/// Token record as written by the issuing service.
#[derive(Debug, Deserialize)]
struct StoredToken {
    user_id: Uuid,
    username: String,
    #[serde(default)]
    scopes: Vec<String>,
    expires_at: DateTime<Utc>,
}

/// Cache-backed (Valkey/Redis protocol) token lookup.
///
/// Records are keyed by `{prefix}:{base64url(sha256(token))}` so raw tokens
/// never appear in the key space.
///
/// Failure policy:
/// - missing key, undecodable record, expired record => `Ok(None)`
/// - cache transport/command failure => `Err` (5xx)
#[derive(Clone)]
pub struct CachedTokenAuthenticator<C: CacheClient> {
    cache: Arc<C>,
    prefix: String,
}

impl CachedTokenAuthenticator<ValkeyClient> {
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, AuthError> {
        let client = ValkeyClient::new(url).await?;
        Ok(Self::new_with_cache(Arc::new(client), prefix))
    }
}

impl<C: CacheClient> CachedTokenAuthenticator<C> {
    pub fn new_with_cache(cache: Arc<C>, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, token: &str) -> String {
        let digest = Sha256::digest(token.as_bytes());
        format!("{}:{}", self.prefix, URL_SAFE_NO_PAD.encode(digest))
    }
}

#[async_trait]
impl<C: CacheClient> Authenticator for CachedTokenAuthenticator<C> {
    fn backend_name(&self) -> &'static str {
        self.cache.backend_name()
    }

    async fn authenticate(&self, parts: &Parts) -> Result<Option<Principal>, AuthError> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(None);
        };

        let Some(raw) = self.cache.get_string(&self.key(token)).await? else {
            tracing::debug!("no token record found");
            return Ok(None);
        };

        let stored: StoredToken = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = %err, "undecodable token record");
                return Ok(None);
            }
        };

        if stored.expires_at <= Utc::now() {
            tracing::debug!(user_id = %stored.user_id, "token record expired");
            return Ok(None);
        }

        let principal = Principal::new(stored.user_id, stored.username, AuthMethod::BearerToken)
            .with_scopes(stored.scopes);

        Ok(Some(principal))
    }
}
