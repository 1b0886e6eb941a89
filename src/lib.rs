//! # Gateway credential helper
//!
//! Brokers short-lived Databricks access tokens for the Claude CLI:
//! an Azure AD ID token is exchanged (RFC 8693) for a workspace OAuth token,
//! which is cached across invocations and refreshed when it expires.
//!
//! Modules:
//! - `config`: gateway configuration file and its discovery
//! - `cache`: cached token, validity policy and the backend chain
//! - `exchange`: token exchange client
//! - `identity`: Azure AD session reuse and interactive sign-in
//! - `broker`: composes the above into `get_token` / `check`

pub mod broker;
pub mod cache;
pub mod config;
pub mod error;
pub mod exchange;
pub mod helpers;
pub mod identity;
pub mod launcher;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::broker::{CheckReport, IssuedToken, TokenBroker};
pub use crate::config::GatewayConfig;
