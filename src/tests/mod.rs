pub mod common;

mod identity_session;
mod launcher_env;
mod token_exchange;
