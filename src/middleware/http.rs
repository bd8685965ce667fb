//! Outer HTTP layers for the token-gated router.
//!
//! Everything here wraps the session layer and the token gate. Responses made
//! out here (408 on timeout, 413 on an oversized body) never pass through the
//! gate, and neither does a session failure when the session layer is the
//! outer identity layer. The outermost `Vary` patch covers all of them.

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::Request;
use axum::http::{StatusCode, header, header::HeaderName};
use axum::middleware::{Next, from_fn};
use axum::response::Response;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::vary::patch_vary_headers;

const REQUEST_ID: &str = "x-request-id";

/// Wrap `router` with request ids, tracing, body/time limits and the final
/// `Vary: Authorization` patch.
pub fn apply(router: Router, config: &Config) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID);

    let layers = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(limit_error))
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http());

    router.layer(layers).layer(from_fn(vary_authorization))
}

async fn limit_error(err: BoxError) -> StatusCode {
    if err.is::<Elapsed>() {
        tracing::warn!("request exceeded the configured timeout");
        StatusCode::REQUEST_TIMEOUT
    } else {
        tracing::error!(error = %err, "outer layer failed");
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

async fn vary_authorization(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    patch_vary_headers(response.headers_mut(), &[header::AUTHORIZATION]);
    response
}
