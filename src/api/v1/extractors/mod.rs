pub mod identity;

pub use identity::{
    AuthMethod, CurrentIdentity, Identity, Principal, RequireUser, ResolvedIdentity,
    attach_resolved,
};
