/*
 * Responsibility
 * - GET /me: 現在の identity を返す (anonymous でも 200)
 * - GET /private: 認証済みのみ (anonymous は 401)
 */
use axum::Json;

use crate::api::v1::dto::identity::IdentityResponse;
use crate::api::v1::extractors::{CurrentIdentity, RequireUser};

pub async fn me(CurrentIdentity(identity): CurrentIdentity) -> Json<IdentityResponse> {
    Json(identity.into())
}

pub async fn private(RequireUser(principal): RequireUser) -> Json<IdentityResponse> {
    tracing::debug!(user_id = %principal.user_id, "private resource accessed");
    Json(principal.into())
}
