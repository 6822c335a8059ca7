use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;

use super::{error::ConfigError, settings::Settings};

/// Overrides `base_url`.
pub const ENV_BASE_URL: &str = "SCRAPE_API_URL";
/// Supplies `api_key`.
pub const ENV_API_KEY: &str = "SCRAPE_API_KEY";

const CONFIG_DIR_NAME: &str = "scrape-client";
const CONFIG_FILE_NAME: &str = "config.toml";

/// `<config dir>/scrape-client/config.toml`, when a config dir exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads settings from `path`, or from the default location.
///
/// An explicit path must exist; a missing default file yields defaults.
/// Environment overrides are applied last, then policies are validated.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    load_settings_with_env(path, |key| std::env::var(key).ok())
}

/// Same as [`load_settings`], with environment variables taken from `lookup`.
pub fn load_settings_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = match path {
        Some(path) => read_settings(path)?,
        None => match default_config_path() {
            Some(path) => read_optional(&path)?,
            None => Settings::default(),
        },
    };
    apply_env_overrides(&mut settings, lookup);
    validate(&settings)?;
    Ok(settings)
}

/// Applies `SCRAPE_API_URL` / `SCRAPE_API_KEY` taken from `lookup`.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
        log::debug!("base_url overridden from {ENV_BASE_URL}");
        settings.base_url = url;
    }
    if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
        settings.api_key = Some(SecretString::new(key));
    }
}

fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

fn read_optional(path: &Path) -> Result<Settings, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(err) => Err(ConfigError::Io(err)),
    }
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.timeout_seconds == 0 {
        return Err(ConfigError::InvalidTimeout);
    }
    settings.retry.validate().map_err(ConfigError::InvalidPolicy)?;
    settings
        .health
        .probe
        .validate()
        .map_err(|reason| ConfigError::InvalidPolicy(format!("health.probe: {reason}")))?;
    Ok(())
}
