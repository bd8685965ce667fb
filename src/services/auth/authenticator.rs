use async_trait::async_trait;
use axum::http::request::Parts;
use thiserror::Error;

use crate::api::v1::extractors::Principal;
use crate::services::cache::CacheError;

/// Failures of the token backend itself.
///
/// An unknown, expired or malformed token is NOT an error: authenticators
/// return `Ok(None)` for those.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Resolves the bearer credential carried by a request to a principal.
///
/// Returns:
/// - `Ok(Some(_))` => the credential identifies a principal
/// - `Ok(None)`    => no usable credential (missing, unknown, expired, malformed)
/// - `Err(_)`      => backend failure (surfaced to the client as 5xx)
#[async_trait]
pub trait Authenticator: Send + Sync + 'static {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn authenticate(&self, parts: &Parts) -> Result<Option<Principal>, AuthError>;
}
