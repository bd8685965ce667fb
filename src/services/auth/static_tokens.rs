use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::request::Parts;

use crate::api::v1::extractors::Principal;
use crate::services::auth::{AuthError, Authenticator, bearer_token};

/// Fixed token table (development / tests).
///
/// Tokens come from `STATIC_BEARER_TOKENS`; nothing is ever written back.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, Principal>,
}

impl StaticTokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    fn backend_name(&self) -> &'static str {
        "static"
    }

    async fn authenticate(&self, parts: &Parts) -> Result<Option<Principal>, AuthError> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(None);
        };

        Ok(self.tokens.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::v1::extractors::AuthMethod;
    use axum::http::Request;
    use uuid::Uuid;

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder();
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn known_token_resolves() {
        let alice = Principal::new(Uuid::new_v4(), "alice", AuthMethod::BearerToken);
        let auth = StaticTokenAuthenticator::new().with_token("abc", alice.clone());

        let resolved = auth.authenticate(&parts(Some("Bearer abc"))).await.unwrap();
        assert_eq!(resolved, Some(alice));
    }

    #[tokio::test]
    async fn unknown_or_missing_token_is_none() {
        let alice = Principal::new(Uuid::new_v4(), "alice", AuthMethod::BearerToken);
        let auth = StaticTokenAuthenticator::new().with_token("abc", alice);

        assert_eq!(auth.authenticate(&parts(Some("Bearer nope"))).await.unwrap(), None);
        assert_eq!(auth.authenticate(&parts(Some("Bearerabc"))).await.unwrap(), None);
        assert_eq!(auth.authenticate(&parts(None)).await.unwrap(), None);
    }
}
