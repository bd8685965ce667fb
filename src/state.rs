/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - gate: bearer token gate, sessions: session resolver
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::middleware::auth::TokenGate;
use crate::services::session::SessionResolver;

#[derive(Clone)]
pub struct AppState {
    pub gate: TokenGate,
    pub sessions: Arc<dyn SessionResolver>,
}

impl AppState {
    pub fn new(gate: TokenGate, sessions: Arc<dyn SessionResolver>) -> Self {
        Self { gate, sessions }
    }
}
