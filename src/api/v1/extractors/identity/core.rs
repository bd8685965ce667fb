use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{Extensions, request::Parts};

use crate::error::AppError;

use super::{Identity, Principal, ResolvedIdentity};

/// Write a resolved principal into both the identity slot and the
/// `ResolvedIdentity` slot, so a later session step observes it.
pub fn attach_resolved(extensions: &mut Extensions, principal: Principal) {
    extensions.insert(ResolvedIdentity(principal.clone()));
    extensions.insert(Identity::User(principal));
}

/// Handler で現在の Identity を受け取る extractor
/// identity slot が空なら Anonymous として扱う（失敗しない）
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .unwrap_or(Identity::Anonymous);

        Ok(CurrentIdentity(identity))
    }
}

/// Handler で認証済み Principal を要求する extractor
/// Anonymous / 未設定の場合は 401 を返す
pub struct RequireUser(pub Principal);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Identity>() {
            Some(Identity::User(principal)) => Ok(RequireUser(principal.clone())),
            _ => Err(AppError::Unauthorized),
        }
    }
}
