use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header, request::Parts},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use token_gate::api::v1::extractors::{AuthMethod, Principal};
use token_gate::app::build_router;
use token_gate::config::{AppEnv, Config, GateOrder, TokenBackend};
use token_gate::middleware::{self, auth::TokenGate};
use token_gate::services::auth::{AuthError, Authenticator, BearerMatch, StaticTokenAuthenticator};
use token_gate::services::session::{InMemorySessions, SessionResolver};
use token_gate::state::AppState;

struct Fixture {
    alice: Uuid,
    bot: Uuid,
}

impl Fixture {
    fn new() -> Self {
        Self {
            alice: Uuid::new_v4(),
            bot: Uuid::new_v4(),
        }
    }

    fn state(&self, auth: Arc<dyn Authenticator>) -> AppState {
        let sessions = InMemorySessions::new().with_session(
            "alice-session",
            Principal::new(self.alice, "alice", AuthMethod::Session),
        );
        AppState::new(
            TokenGate::new(auth, BearerMatch::Prefix),
            Arc::new(sessions),
        )
    }

    fn tokens(&self) -> Arc<dyn Authenticator> {
        Arc::new(StaticTokenAuthenticator::new().with_token(
            "abc",
            Principal::new(self.bot, "bot", AuthMethod::BearerToken).with_scopes(["read"]),
        ))
    }

    fn app(&self, order: GateOrder) -> Router {
        build_router(self.state(self.tokens()), order)
    }
}

struct BrokenBackend;

#[async_trait]
impl Authenticator for BrokenBackend {
    fn backend_name(&self) -> &'static str {
        "broken"
    }

    async fn authenticate(&self, _parts: &Parts) -> Result<Option<Principal>, AuthError> {
        Err(AuthError::Backend("connection reset".into()))
    }
}

struct BrokenSessions;

#[async_trait]
impl SessionResolver for BrokenSessions {
    async fn resolve(&self, _parts: &Parts) -> Result<Option<Principal>, AuthError> {
        Err(AuthError::Backend("session store unreachable".into()))
    }
}

fn config() -> Config {
    Config {
        addr: ([127, 0, 0, 1], 0).into(),
        app_env: AppEnv::Development,
        token_backend: TokenBackend::Static,
        token_cache_prefix: "oauth2:access_token".to_string(),
        static_tokens: Vec::new(),
        static_sessions: Vec::new(),
        bearer_match: BearerMatch::Prefix,
        gate_order: GateOrder::AfterSession,
        request_timeout_seconds: 30,
        body_limit_bytes: 1024,
    }
}

fn get(uri: &str, authorization: Option<&str>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    if let Some(value) = cookie {
        builder = builder.header(header::COOKIE, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let vary = resp
        .headers()
        .get(header::VARY)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, vary, body)
}

#[tokio::test]
async fn no_credentials_is_anonymous() {
    let fx = Fixture::new();
    let app = fx.app(GateOrder::AfterSession);

    let (status, vary, body) = call(app, get("/api/v1/me", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(vary.as_deref(), Some("Authorization"));
    assert_eq!(body, json!({"authenticated": false}));
}

#[tokio::test]
async fn bearer_token_authenticates_in_both_orders() {
    let fx = Fixture::new();

    for order in [GateOrder::AfterSession, GateOrder::BeforeSession] {
        let (status, _, body) =
            call(fx.app(order), get("/api/v1/me", Some("Bearer abc"), None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_id"], json!(fx.bot));
        assert_eq!(body["method"], "bearer_token");
        assert_eq!(body["scopes"], json!(["read"]));
    }
}

#[tokio::test]
async fn session_identity_wins_when_gate_runs_after_session() {
    let fx = Fixture::new();

    let (status, _, body) = call(
        fx.app(GateOrder::AfterSession),
        get("/api/v1/me", Some("Bearer abc"), Some("sessionid=alice-session")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], json!(fx.alice));
    assert_eq!(body["method"], "session");
}

#[tokio::test]
async fn bearer_identity_survives_when_gate_runs_before_session() {
    let fx = Fixture::new();

    let (status, _, body) = call(
        fx.app(GateOrder::BeforeSession),
        get("/api/v1/me", Some("Bearer abc"), Some("sessionid=alice-session")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], json!(fx.bot));
    assert_eq!(body["method"], "bearer_token");
}

#[tokio::test]
async fn invalid_token_falls_back_to_session_or_anonymous() {
    let fx = Fixture::new();

    for order in [GateOrder::AfterSession, GateOrder::BeforeSession] {
        let (_, _, body) = call(
            fx.app(order),
            get("/api/v1/me", Some("Bearer invalid"), Some("sessionid=alice-session")),
        )
        .await;
        assert_eq!(body["user_id"], json!(fx.alice), "{order:?}");

        let (status, vary, body) =
            call(fx.app(order), get("/api/v1/me", Some("Bearer invalid"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(vary.as_deref(), Some("Authorization"));
        assert_eq!(body, json!({"authenticated": false}));
    }
}

#[tokio::test]
async fn private_route_requires_a_user() {
    let fx = Fixture::new();

    let (status, vary, body) = call(
        fx.app(GateOrder::AfterSession),
        get("/api/v1/private", Some("Bearer invalid"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(vary.as_deref(), Some("Authorization"));
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _, body) = call(
        fx.app(GateOrder::AfterSession),
        get("/api/v1/private", Some("Bearer abc"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "bot");
}

#[tokio::test]
async fn backend_failure_is_surfaced_as_500() {
    let fx = Fixture::new();

    for order in [GateOrder::AfterSession, GateOrder::BeforeSession] {
        let app = build_router(fx.state(Arc::new(BrokenBackend)), order);

        let (status, vary, body) = call(app, get("/api/v1/me", Some("Bearer abc"), None)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(vary.as_deref(), Some("Authorization"));
        assert_eq!(body["error"]["code"], "INTERNAL_SERVER_ERROR");
    }
}

#[tokio::test]
async fn broken_backend_is_not_consulted_without_bearer_header() {
    let fx = Fixture::new();
    let app = build_router(fx.state(Arc::new(BrokenBackend)), GateOrder::AfterSession);

    let (status, _, body) = call(
        app,
        get("/api/v1/me", Some("Basic dXNlcjpwYXNz"), Some("sessionid=alice-session")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], json!(fx.alice));
}

#[tokio::test]
async fn unknown_route_still_varies_on_authorization() {
    let fx = Fixture::new();

    let (status, vary, _) = call(fx.app(GateOrder::AfterSession), get("/nope", None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(vary.as_deref(), Some("Authorization"));
}

#[tokio::test]
async fn session_failure_outside_the_gate_still_varies() {
    let fx = Fixture::new();
    let state = AppState::new(
        TokenGate::new(fx.tokens(), BearerMatch::Prefix),
        Arc::new(BrokenSessions),
    );
    let app = build_router(state, GateOrder::AfterSession);
    let app = middleware::http::apply(app, &config());

    let (status, vary, body) = call(app, get("/api/v1/me", Some("Bearer abc"), None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(vary.as_deref(), Some("Authorization"));
    assert_eq!(body["error"]["code"], "INTERNAL_SERVER_ERROR");
}
