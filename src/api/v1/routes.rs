/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health, /me, /private
 * - 認証 layer (session / token gate) は app.rs 側で Router 全体に掛ける
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    me::{me, private},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
        .route("/private", get(private))
}
