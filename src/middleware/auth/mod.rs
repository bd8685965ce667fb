pub mod session;
pub mod token;

pub use token::TokenGate;
