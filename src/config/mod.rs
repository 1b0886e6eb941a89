pub mod gateway;
pub mod loader;
pub mod settings;

pub use gateway::{AzureAdConfig, CacheFallback, CacheMethod, GatewayConfig, TokenCacheConfig};
