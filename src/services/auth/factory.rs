//! Factory: build the token gate and the session resolver from application `Config`.
use std::sync::Arc;

use crate::api::v1::extractors::{AuthMethod, Principal};
use crate::config::{Config, StaticCredential, TokenBackend};
use crate::error::AppError;
use crate::middleware::auth::token::TokenGate;
use crate::services::auth::{Authenticator, CachedTokenAuthenticator, StaticTokenAuthenticator};
use crate::services::session::{InMemorySessions, SessionResolver};

fn principal(cred: &StaticCredential, method: AuthMethod) -> Principal {
    Principal::new(cred.user_id, cred.username.clone(), method).with_scopes(cred.scopes.clone())
}

pub async fn build_authenticator(config: &Config) -> Result<Arc<dyn Authenticator>, AppError> {
    let auth: Arc<dyn Authenticator> = match &config.token_backend {
        TokenBackend::Static => {
            let auth = config
                .static_tokens
                .iter()
                .fold(StaticTokenAuthenticator::new(), |auth, cred| {
                    auth.with_token(cred.secret.clone(), principal(cred, AuthMethod::BearerToken))
                });

            if auth.is_empty() {
                tracing::warn!(
                    "static token backend has no tokens; bearer auth will never succeed"
                );
            }
            Arc::new(auth)
        }
        TokenBackend::Valkey { url } => {
            let prefix = config.token_cache_prefix.clone();
            Arc::new(CachedTokenAuthenticator::connect(url, prefix).await?)
        }
    };

    tracing::info!(backend = auth.backend_name(), "token authenticator ready");
    Ok(auth)
}

pub async fn build_token_gate(config: &Config) -> Result<TokenGate, AppError> {
    let auth = build_authenticator(config).await?;
    Ok(TokenGate::new(auth, config.bearer_match))
}

pub fn build_session_resolver(config: &Config) -> Arc<dyn SessionResolver> {
    let sessions = config
        .static_sessions
        .iter()
        .fold(InMemorySessions::new(), |sessions, cred| {
            sessions.with_session(cred.secret.clone(), principal(cred, AuthMethod::Session))
        });

    Arc::new(sessions)
}
