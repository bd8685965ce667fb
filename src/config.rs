/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, token backend, session, gate の順序など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use uuid::Uuid;

use crate::services::auth::BearerMatch;
use crate::services::auth::cached::DEFAULT_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where bearer tokens are looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenBackend {
    Static,
    Valkey { url: String },
}

/// Where the token gate sits relative to the session layer.
///
/// - `AfterSession`: the session runs first; a concrete session identity wins
///   and the token is not looked up.
/// - `BeforeSession`: the token runs first; the session layer then keeps the
///   bearer identity (via `ResolvedIdentity`) instead of reading the cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateOrder {
    #[default]
    AfterSession,
    BeforeSession,
}

impl FromStr for GateOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "after_session" => Ok(Self::AfterSession),
            "before_session" => Ok(Self::BeforeSession),
            _ => Err(()),
        }
    }
}

/// One `secret=user_uuid:username[:scope scope ...]` entry.
///
/// `secret` is a bearer token for `STATIC_BEARER_TOKENS` and a session id for
/// `STATIC_SESSIONS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCredential {
    pub secret: String,
    pub user_id: Uuid,
    pub username: String,
    pub scopes: Vec<String>,
}

/// Parse a `;`-separated list of `StaticCredential` entries.
pub fn parse_credentials(
    raw: &str,
    key: &'static str,
) -> Result<Vec<StaticCredential>, ConfigError> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (secret, rest) = entry.split_once('=').ok_or(ConfigError::Invalid(key))?;
            let mut fields = rest.splitn(3, ':');

            let user_id = fields
                .next()
                .and_then(|v| Uuid::parse_str(v.trim()).ok())
                .ok_or(ConfigError::Invalid(key))?;
            let username = fields
                .next()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Invalid(key))?;
            let scopes = fields
                .next()
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();

            let secret = secret.trim();
            if secret.is_empty() {
                return Err(ConfigError::Invalid(key));
            }

            Ok(StaticCredential {
                secret: secret.to_string(),
                user_id,
                username: username.to_string(),
                scopes,
            })
        })
        .collect()
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub token_backend: TokenBackend,
    pub token_cache_prefix: String,
    pub static_tokens: Vec<StaticCredential>,
    pub static_sessions: Vec<StaticCredential>,

    pub bearer_match: BearerMatch,
    pub gate_order: GateOrder,

    pub request_timeout_seconds: u64,
    pub body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let token_backend = match std::env::var("TOKEN_AUTH_BACKEND")
            .unwrap_or_else(|_| "static".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "static" => TokenBackend::Static,
            "valkey" | "redis" => TokenBackend::Valkey {
                url: std::env::var("VALKEY_URL")
                    .map_err(|_| ConfigError::Missing("VALKEY_URL"))?,
            },
            _ => return Err(ConfigError::Invalid("TOKEN_AUTH_BACKEND")),
        };

        let token_cache_prefix =
            std::env::var("TOKEN_CACHE_PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string());

        let static_tokens = parse_credentials(
            &std::env::var("STATIC_BEARER_TOKENS").unwrap_or_default(),
            "STATIC_BEARER_TOKENS",
        )?;

        let static_sessions = parse_credentials(
            &std::env::var("STATIC_SESSIONS").unwrap_or_default(),
            "STATIC_SESSIONS",
        )?;

        let bearer_match = match std::env::var("BEARER_MATCH") {
            Ok(v) => v.parse().map_err(|_| ConfigError::Invalid("BEARER_MATCH"))?,
            Err(_) => BearerMatch::default(),
        };

        let gate_order = match std::env::var("TOKEN_GATE_ORDER") {
            Ok(v) => v
                .parse()
                .map_err(|_| ConfigError::Invalid("TOKEN_GATE_ORDER"))?,
            Err(_) => GateOrder::default(),
        };

        let request_timeout_seconds = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let body_limit_bytes = std::env::var("BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            token_backend,
            token_cache_prefix,
            static_tokens,
            static_sessions,
            bearer_match,
            gate_order,
            request_timeout_seconds,
            body_limit_bytes,
        })
    }
}
