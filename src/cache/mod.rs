pub mod backend;
pub mod file_store;
pub mod secure_store;
pub mod token;
pub mod token_store;

pub use token::CachedToken;
pub use token_store::{SaveOutcome, TokenStore};
