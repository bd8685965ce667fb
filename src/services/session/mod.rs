pub mod memory;
pub mod resolver;

pub use memory::InMemorySessions;
pub use resolver::{SESSION_COOKIE, SessionResolver, session_id};
