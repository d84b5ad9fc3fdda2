//! Application-level configuration loading.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "FASTBREAK_PICKS_CONFIG_PATH";
/// Environment override for the provider API key, so the key can stay out of
/// the config file.
const API_KEY_ENV: &str = "FASTBREAK_PICKS_API_KEY";
/// Environment override for the admin token guarding `/v1/admin` routes.
const ADMIN_TOKEN_ENV: &str = "FASTBREAK_PICKS_ADMIN_TOKEN";

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Settings for the external sports-data provider.
    pub provider: ProviderSettings,
    /// Shared secret expected in `x-admin-token`; unset skips the check.
    pub admin_token: Option<String>,
}

/// How to reach the sports-data provider and which season to track.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Whether the daily scheduled poll/evaluate pipeline runs.
    pub enabled: bool,
    /// Season id used for pick sets and the default leaderboard.
    pub season: String,
    /// Date-addressed endpoint; the `YYYY-MM-DD` date is appended verbatim.
    pub base_url: String,
    /// Account key sent in the `x-rapidapi-key` header.
    pub api_key: String,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in defaults, then apply environment overrides.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        if let Ok(api_key) = env::var(API_KEY_ENV)
            && !api_key.is_empty()
        {
            config.provider.api_key = api_key;
        }
        if let Ok(token) = env::var(ADMIN_TOKEN_ENV)
            && !token.is_empty()
        {
            config.admin_token = Some(token);
        }

        config
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderSettings {
                enabled: false,
                season: "2019".to_owned(),
                base_url: "https://api-nba-v1.p.rapidapi.com/games/date/".to_owned(),
                api_key: String::new(),
            },
            admin_token: None,
        }
    }
}

/// JSON representation of the configuration file.
#[derive(Debug, Deserialize)]
struct RawConfig {
    provider: RawProvider,
    #[serde(default)]
    admin_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawProvider {
    #[serde(default)]
    enabled: bool,
    season: String,
    base_url: String,
    #[serde(default)]
    api_key: String,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            provider: ProviderSettings {
                enabled: value.provider.enabled,
                season: value.provider.season,
                base_url: value.provider.base_url,
                api_key: value.provider.api_key,
            },
            admin_token: value.admin_token,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
