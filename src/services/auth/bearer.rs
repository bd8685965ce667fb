//! Bearer scheme matching.
//!
//! Two questions are answered here:
//! - Does this Authorization header look like a bearer credential at all?
//!   (`BearerMatch`, used by the gate to decide whether to try authentication)
//! - What is the token? (`bearer_token`, used by authenticators)

use std::str::FromStr;

use axum::http::{HeaderMap, header};

/// How the gate recognizes a bearer credential.
///
/// Scheme casing is always exact (`Bearer`); `bearer abc` never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BearerMatch {
    /// `starts_with("Bearer")`. `Bearerxyz` matches too; the authenticator
    /// then finds no token and returns `None`.
    #[default]
    Prefix,
    /// `starts_with("Bearer ")`: the scheme must be followed by a space.
    Scheme,
}

impl BearerMatch {
    pub fn matches(self, value: &str) -> bool {
        match self {
            Self::Prefix => value.starts_with("Bearer"),
            Self::Scheme => value.starts_with("Bearer "),
        }
    }
}

impl FromStr for BearerMatch {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefix" => Ok(Self::Prefix),
            "scheme" | "strict" => Ok(Self::Scheme),
            _ => Err(()),
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// Returns `None` when the header is absent, not visible ASCII, uses another
/// scheme, or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
