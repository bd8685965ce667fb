/*
 * Responsibility
 * - Config読み込み → 依存生成 (token gate / session resolver) → Router 組み立て
 * - Middleware の適用 (session / token gate / HTTP)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, GateOrder};
use crate::services::auth::{build_session_resolver, build_token_gate};
use crate::{api, middleware, state::AppState};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,token_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        bearer_match = ?config.bearer_match,
        gate_order = ?config.gate_order,
        "starting token gate"
    );

    let state = build_state(&config).await?;
    let app = build_router(state, config.gate_order);
    let app = middleware::http::apply(app, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let gate = build_token_gate(config).await?;
    let sessions = build_session_resolver(config);

    Ok(AppState::new(gate, sessions))
}

/// Routes + identity layers (without the HTTP-level layers).
///
/// `Router::layer` wraps what is already there, so the layer applied last runs
/// first on the way in.
pub fn build_router(state: AppState, order: GateOrder) -> Router {
    let gate = state.gate.clone();
    let sessions = state.sessions.clone();

    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    match order {
        GateOrder::AfterSession => {
            let router = middleware::auth::token::apply(router, gate);
            middleware::auth::session::apply(router, sessions)
        }
        GateOrder::BeforeSession => {
            let router = middleware::auth::session::apply(router, sessions);
            middleware::auth::token::apply(router, gate)
        }
    }
}
