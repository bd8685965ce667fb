use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::request::Parts;

use crate::api::v1::extractors::Principal;
use crate::services::auth::AuthError;
use crate::services::session::{SessionResolver, session_id};

/// Fixed session table (development / tests), loaded from `STATIC_SESSIONS`.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessions {
    sessions: HashMap<String, Principal>,
}

impl InMemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(mut self, session_id: impl Into<String>, principal: Principal) -> Self {
        self.sessions.insert(session_id.into(), principal);
        self
    }
}

#[async_trait]
impl SessionResolver for InMemorySessions {
    async fn resolve(&self, parts: &Parts) -> Result<Option<Principal>, AuthError> {
        Ok(session_id(&parts.headers).and_then(|id| self.sessions.get(id).cloned()))
    }
}
