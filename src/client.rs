//! HTTP access to the scraping service.

#[path = "client/config.rs"]
mod config;

#[path = "client/cache_bust.rs"]
mod cache_bust;

#[path = "client/api_client.rs"]
mod api_client;

pub use api_client::{ApiClient, NO_BODY};
pub use cache_bust::{CacheBuster, CACHE_BUST_PARAM};
pub use config::ClientConfig;
