//! File and environment configuration.

#[path = "config/error.rs"]
mod error;

#[path = "config/settings.rs"]
mod settings;

#[path = "config/load.rs"]
mod load;

pub use error::ConfigError;
pub use load::{
    apply_env_overrides, default_config_path, load_settings, load_settings_with_env, ENV_API_KEY,
    ENV_BASE_URL,
};
pub use settings::{HealthSettings, Settings};
