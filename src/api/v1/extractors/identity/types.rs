/*
 * Responsibility
 * - request extensions に載る「誰がリクエストしているか」の型
 * - middleware (session / bearer token) が書き込み、handler は extractor 経由で読む
 *
 * Notes
 * - token の検証や session の解決は services 側の責務
 * - ここは型（契約）だけを固定する
 */
use serde::Serialize;
use uuid::Uuid;

/// How a principal was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Session,
    BearerToken,
}

/// A concrete, authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub scopes: Vec<String>,
    pub method: AuthMethod,
}

impl Principal {
    pub fn new(user_id: Uuid, username: impl Into<String>, method: AuthMethod) -> Self {
        Self {
            user_id,
            username: username.into(),
            scopes: Vec::new(),
            method,
        }
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }
}

/// The identity slot of a request.
///
/// Stored in request extensions. A request with no `Identity` extension has
/// not been through any identity-resolution step yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User(Principal),
}

/// Identity resolved from a bearer token earlier in the pipeline.
///
/// If present, later identity-resolution steps (e.g. the session layer) must
/// use it instead of resolving the identity from another source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity(pub Principal);
