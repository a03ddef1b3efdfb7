//! Layered configuration loading.
//!
//! Precedence, lowest first: built-in defaults, TOML file, `.env` file,
//! process environment. Environment input can be injected so callers (and
//! tests) never have to mutate the process environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, warn};

use crate::models::{AccessToken, ReelscopeConfig};
use crate::validation::{ConfigWarnings, apply_guard_rails};

pub mod error;

use error::ConfigLoadError;

pub const ENV_CONFIG_PATH: &str = "REELSCOPE_CONFIG";
pub const ENV_API_BASE_URL: &str = "REELSCOPE_API_BASE_URL";
pub const ENV_IMAGE_BASE_URL: &str = "REELSCOPE_IMAGE_BASE_URL";
pub const ENV_ACCESS_TOKEN: &str = "REELSCOPE_ACCESS_TOKEN";
/// Accepted when `REELSCOPE_ACCESS_TOKEN` is absent
pub const ENV_TMDB_ACCESS_TOKEN: &str = "TMDB_ACCESS_TOKEN";
pub const ENV_REQUEST_TIMEOUT: &str = "REELSCOPE_REQUEST_TIMEOUT";
pub const ENV_DEBOUNCE_MS: &str = "REELSCOPE_DEBOUNCE_MS";
pub const ENV_MIN_QUERY_CHARS: &str = "REELSCOPE_MIN_QUERY_CHARS";
pub const ENV_SUGGESTION_LIMIT: &str = "REELSCOPE_SUGGESTION_LIMIT";
pub const ENV_INCLUDE_PEOPLE: &str = "REELSCOPE_INCLUDE_PEOPLE";
pub const ENV_PREFERENCES_PATH: &str = "REELSCOPE_PREFERENCES_PATH";
pub const ENV_LANGUAGE: &str = "REELSCOPE_LANGUAGE";
pub const ENV_HISTORY_LIMIT: &str = "REELSCOPE_HISTORY_LIMIT";

/// Where the file layer of a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
}

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: ReelscopeConfig,
    pub source: ConfigSource,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit TOML file instead of the discovered one.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Read `.env` style overrides from this file instead of searching for `.env`.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Replace the process environment with a fixed set of variables.
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env = self.collect_env()?;

        let file = self
            .config_path
            .clone()
            .or_else(|| env.get(ENV_CONFIG_PATH).map(PathBuf::from))
            .or_else(default_config_file);

        let (mut config, source) = match file {
            Some(path) => (read_config_file(&path)?, ConfigSource::File(path)),
            None => (ReelscopeConfig::default(), ConfigSource::Defaults),
        };

        apply_env_overrides(&mut config, &env)?;
        let warnings = apply_guard_rails(&config)?;
        for warning in &warnings.items {
            warn!(hint = ?warning.hint, "{}", warning.message);
        }
        debug!(?source, "configuration loaded");

        Ok(ConfigLoad {
            config,
            source,
            warnings,
        })
    }

    fn collect_env(&self) -> Result<HashMap<String, String>, ConfigLoadError> {
        let mut merged = HashMap::new();

        match &self.env_file {
            Some(path) => {
                for item in dotenvy::from_path_iter(path)? {
                    let (key, value) = item?;
                    merged.insert(key, value);
                }
            }
            None if self.env.is_none() => {
                // A missing `.env` is the common case.
                if let Ok(iter) = dotenvy::dotenv_iter() {
                    for item in iter {
                        let (key, value) = item?;
                        merged.insert(key, value);
                    }
                }
            }
            None => {}
        }

        match &self.env {
            Some(vars) => merged.extend(vars.clone()),
            None => merged.extend(std::env::vars()),
        }

        Ok(merged)
    }
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("reelscope").join("config.toml"))
        .filter(|path| path.exists())
}

fn read_config_file(path: &Path) -> Result<ReelscopeConfig, ConfigLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        ConfigLoadError::FileIo {
            path: path.to_path_buf(),
            source,
        }
    })?;
    toml::from_str(&raw).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

fn apply_env_overrides(
    config: &mut ReelscopeConfig,
    env: &HashMap<String, String>,
) -> Result<(), ConfigLoadError> {
    let get = |key: &str| {
        env.get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    };

    if let Some(url) = get(ENV_API_BASE_URL) {
        config.catalog.api_base_url = url.to_string();
    }
    if let Some(url) = get(ENV_IMAGE_BASE_URL) {
        config.catalog.image_base_url = url.to_string();
    }
    if let Some(token) = get(ENV_ACCESS_TOKEN).or_else(|| get(ENV_TMDB_ACCESS_TOKEN)) {
        config.catalog.access_token = AccessToken::new(token);
    }
    if let Some(raw) = get(ENV_REQUEST_TIMEOUT) {
        config.catalog.request_timeout = humantime::parse_duration(raw)
            .map_err(|err| invalid(ENV_REQUEST_TIMEOUT, raw, err))?;
    }
    if let Some(raw) = get(ENV_DEBOUNCE_MS) {
        let millis: u64 = parse(ENV_DEBOUNCE_MS, raw)?;
        config.search.debounce = Duration::from_millis(millis);
    }
    if let Some(raw) = get(ENV_MIN_QUERY_CHARS) {
        config.search.min_query_chars = parse(ENV_MIN_QUERY_CHARS, raw)?;
    }
    if let Some(raw) = get(ENV_SUGGESTION_LIMIT) {
        config.search.suggestion_limit = parse(ENV_SUGGESTION_LIMIT, raw)?;
    }
    if let Some(raw) = get(ENV_INCLUDE_PEOPLE) {
        config.search.include_people = parse_flag(ENV_INCLUDE_PEOPLE, raw)?;
    }
    if let Some(path) = get(ENV_PREFERENCES_PATH) {
        config.preferences.path = Some(PathBuf::from(path));
    }
    if let Some(code) = get(ENV_LANGUAGE) {
        config.preferences.fallback_language = code.to_string();
    }
    if let Some(raw) = get(ENV_HISTORY_LIMIT) {
        config.preferences.history_limit = parse(ENV_HISTORY_LIMIT, raw)?;
    }

    Ok(())
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigLoadError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|err| invalid(key, raw, err))
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigLoadError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, raw, "expected a boolean")),
    }
}

fn invalid(
    key: &'static str,
    raw: &str,
    reason: impl std::fmt::Display,
) -> ConfigLoadError {
    ConfigLoadError::InvalidEnv {
        key,
        value: raw.to_string(),
        reason: reason.to_string(),
    }
}
