use async_trait::async_trait;
use axum::http::{HeaderMap, header, request::Parts};

use crate::api::v1::extractors::Principal;
use crate::services::auth::AuthError;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "sessionid";

/// Resolves a session cookie to a principal.
///
/// Same contract as `Authenticator`: `Ok(None)` for a missing or unknown
/// session, `Err` only for backend failures.
#[async_trait]
pub trait SessionResolver: Send + Sync + 'static {
    async fn resolve(&self, parts: &Parts) -> Result<Option<Principal>, AuthError>;
}

/// Find the session id in the `Cookie` header(s).
pub fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .map(|(name, value)| (name, value.trim()))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value)
}
