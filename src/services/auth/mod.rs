pub mod authenticator;
pub mod bearer;
pub mod cached;
pub mod factory;
pub mod static_tokens;

pub use authenticator::{AuthError, Authenticator};
pub use bearer::{BearerMatch, bearer_token};
pub use cached::CachedTokenAuthenticator;
pub use factory::{build_session_resolver, build_token_gate};
pub use static_tokens::StaticTokenAuthenticator;
