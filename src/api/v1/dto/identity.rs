use serde::Serialize;
use uuid::Uuid;

use crate::api::v1::extractors::{AuthMethod, Identity, Principal};

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<AuthMethod>,
}

impl From<Principal> for IdentityResponse {
    fn from(p: Principal) -> Self {
        Self {
            authenticated: true,
            user_id: Some(p.user_id),
            username: Some(p.username),
            scopes: p.scopes,
            method: Some(p.method),
        }
    }
}

impl From<Identity> for IdentityResponse {
    fn from(identity: Identity) -> Self {
        match identity {
            Identity::User(principal) => principal.into(),
            Identity::Anonymous => Self {
                authenticated: false,
                user_id: None,
                username: None,
                scopes: Vec::new(),
                method: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn anonymous_serializes_compactly() {
        let body = serde_json::to_value(IdentityResponse::from(Identity::Anonymous)).unwrap();
        assert_eq!(body, json!({"authenticated": false}));
    }

    #[test]
    fn user_serializes_method_in_snake_case() {
        let id = Uuid::new_v4();
        let principal = Principal::new(id, "alice", AuthMethod::BearerToken).with_scopes(["read"]);

        let body = serde_json::to_value(IdentityResponse::from(principal)).unwrap();
        assert_eq!(
            body,
            json!({
                "authenticated": true,
                "user_id": id,
                "username": "alice",
                "scopes": ["read"],
                "method": "bearer_token",
            })
        );
    }
}
