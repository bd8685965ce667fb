//! Session-cookie authentication.
//!
//! Always leaves a value in the identity slot: `Identity::User` for a known
//! session, `Identity::Anonymous` otherwise. If the token gate already ran and
//! left a `ResolvedIdentity`, that identity is used and the cookie is not read.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, request::Parts},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::{Identity, ResolvedIdentity};
use crate::error::AppError;
use crate::services::auth::AuthError;
use crate::services::session::SessionResolver;

pub fn apply<S>(router: Router<S>, sessions: Arc<dyn SessionResolver>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(sessions, session_middleware))
}

pub async fn authenticate_session(
    sessions: &dyn SessionResolver,
    parts: &mut Parts,
) -> Result<(), AuthError> {
    if let Some(ResolvedIdentity(principal)) = parts.extensions.get::<ResolvedIdentity>().cloned()
    {
        tracing::debug!(user_id = %principal.user_id, "using identity resolved earlier");
        parts.extensions.insert(Identity::User(principal));
        return Ok(());
    }

    let identity = match sessions.resolve(parts).await? {
        Some(principal) => {
            tracing::debug!(user_id = %principal.user_id, "session resolved");
            Identity::User(principal)
        }
        None => Identity::Anonymous,
    };

    parts.extensions.insert(identity);
    Ok(())
}

async fn session_middleware(
    State(sessions): State<Arc<dyn SessionResolver>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    authenticate_session(sessions.as_ref(), &mut parts).await?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
