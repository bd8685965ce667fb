//! OAuth2 bearer token gate.
//!
//! Request phase:
//! - no `Bearer` credential => nothing happens (fast path)
//! - identity slot already holds a concrete user (e.g. from the session layer)
//!   => it wins, the token is not looked up
//! - otherwise ask the `Authenticator`; on success write the principal into
//!   both `Identity` and `ResolvedIdentity`, on `None` leave the slot as is
//!
//! Response phase:
//! - always add `Authorization` to `Vary`, whatever happened above
//!
//! The gate never rejects a request. Protected handlers use `RequireUser`.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header, request::Parts},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::api::v1::extractors::{Identity, attach_resolved};
use crate::error::AppError;
use crate::middleware::vary::patch_vary_headers;
use crate::services::auth::{AuthError, Authenticator, BearerMatch};

#[derive(Clone)]
pub struct TokenGate {
    authenticator: Arc<dyn Authenticator>,
    matcher: BearerMatch,
}

impl TokenGate {
    pub fn new(authenticator: Arc<dyn Authenticator>, matcher: BearerMatch) -> Self {
        Self {
            authenticator,
            matcher,
        }
    }

    /// Resolve the bearer credential (if any) into the request's identity slot.
    ///
    /// Authenticator failures are returned as-is; the caller turns them into
    /// a 5xx response.
    pub async fn on_request(&self, parts: &mut Parts) -> Result<(), AuthError> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !self.matcher.matches(authorization) {
            return Ok(());
        }

        if let Some(Identity::User(principal)) = parts.extensions.get::<Identity>() {
            tracing::debug!(
                user_id = %principal.user_id,
                method = ?principal.method,
                "identity already resolved; bearer token ignored"
            );
            return Ok(());
        }

        match self.authenticator.authenticate(parts).await? {
            Some(principal) => {
                tracing::debug!(
                    user_id = %principal.user_id,
                    backend = self.authenticator.backend_name(),
                    "bearer token resolved"
                );
                attach_resolved(&mut parts.extensions, principal);
            }
            None => {
                tracing::debug!(
                    backend = self.authenticator.backend_name(),
                    "bearer token did not resolve; request stays unauthenticated"
                );
            }
        }

        Ok(())
    }

    /// Declare that the response depends on the Authorization header.
    pub fn on_response(&self, mut response: Response) -> Response {
        patch_vary_headers(response.headers_mut(), &[header::AUTHORIZATION]);
        response
    }
}

/// Install the token gate on `router`.
///
/// Layers added later wrap earlier ones, so the order of `apply` calls decides
/// whether the gate runs before or after the session layer.
pub fn apply<S>(router: Router<S>, gate: TokenGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, token_middleware))
}

async fn token_middleware(
    State(gate): State<TokenGate>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let response = match gate.on_request(&mut parts).await {
        Ok(()) => next.run(Request::from_parts(parts, body)).await,
        Err(err) => AppError::from(err).into_response(),
    };

    gate.on_response(response)
}
