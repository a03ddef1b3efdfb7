use std::time::Duration;

use reelscope_model::find_language;
use thiserror::Error;

use super::models::{CatalogConfig, ReelscopeConfig, SearchConfig};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("catalog access token is not configured (set REELSCOPE_ACCESS_TOKEN)")]
    MissingAccessToken,
    #[error("{field} must be an absolute http(s) URL, got `{value}`")]
    InvalidUrl { field: &'static str, value: String },
    #[error("invalid search configuration: {reason}")]
    InvalidSearchConfig { reason: String },
    #[error("fallback language `{code}` is not a supported language")]
    UnsupportedFallbackLanguage { code: String },
    #[error("recent search history limit must be at least 1")]
    EmptyHistoryLimit,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn apply_guard_rails(
    config: &ReelscopeConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    validate_catalog(&config.catalog, &mut warnings)?;
    validate_search(&config.search, &mut warnings)?;

    let fallback = &config.preferences.fallback_language;
    if find_language(fallback).is_none() {
        return Err(ConfigGuardRailError::UnsupportedFallbackLanguage {
            code: fallback.clone(),
        });
    }

    if config.preferences.history_limit == 0 {
        return Err(ConfigGuardRailError::EmptyHistoryLimit);
    }

    if config.preferences.resolved_path().is_none() {
        warnings.push_with_hint(
            "no platform config directory; preferences will not survive restarts",
            "Set REELSCOPE_PREFERENCES_PATH or preferences.path",
        );
    }

    Ok(warnings)
}

fn validate_catalog(
    catalog: &CatalogConfig,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    if catalog.access_token.is_empty() {
        return Err(ConfigGuardRailError::MissingAccessToken);
    }

    check_http_url("catalog.api_base_url", &catalog.api_base_url)?;
    check_http_url("catalog.image_base_url", &catalog.image_base_url)?;

    if catalog.request_timeout < Duration::from_secs(1) {
        warnings.push_with_hint(
            "request timeout below one second; most catalog calls will fail",
            "Use a value such as \"15s\"",
        );
    }

    Ok(())
}

fn validate_search(
    search: &SearchConfig,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    if search.debounce.is_zero() {
        return Err(ConfigGuardRailError::InvalidSearchConfig {
            reason: "debounce must be greater than zero".into(),
        });
    }

    if search.min_query_chars == 0 {
        return Err(ConfigGuardRailError::InvalidSearchConfig {
            reason: "min_query_chars must be at least 1".into(),
        });
    }

    if search.suggestion_limit == 0 {
        return Err(ConfigGuardRailError::InvalidSearchConfig {
            reason: "suggestion_limit must be at least 1".into(),
        });
    }

    if search.debounce > Duration::from_secs(2) {
        warnings.push(format!(
            "search debounce of {} will make typing feel unresponsive",
            humantime::format_duration(search.debounce)
        ));
    }

    Ok(())
}

fn check_http_url(
    field: &'static str,
    value: &str,
) -> Result<(), ConfigGuardRailError> {
    let valid = url::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(ConfigGuardRailError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccessToken;

    fn valid_config() -> ReelscopeConfig {
        let mut config = ReelscopeConfig::default();
        config.catalog.access_token = AccessToken::new("token");
        config
    }

    #[test]
    fn defaults_with_token_pass() {
        assert!(apply_guard_rails(&valid_config()).is_ok());
    }

    #[test]
    fn missing_token_is_rejected() {
        let err = apply_guard_rails(&ReelscopeConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigGuardRailError::MissingAccessToken));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let mut config = valid_config();
        config.catalog.api_base_url = "ftp://example.org".into();
        let err = apply_guard_rails(&config).unwrap_err();
        assert!(matches!(
            err,
            ConfigGuardRailError::InvalidUrl { field: "catalog.api_base_url", .. }
        ));
    }

    #[test]
    fn zero_debounce_and_min_chars_are_rejected() {
        let mut config = valid_config();
        config.search.debounce = Duration::ZERO;
        assert!(apply_guard_rails(&config).is_err());

        let mut config = valid_config();
        config.search.min_query_chars = 0;
        assert!(apply_guard_rails(&config).is_err());
    }

    #[test]
    fn unsupported_fallback_language_is_rejected() {
        let mut config = valid_config();
        config.preferences.fallback_language = "xx-XX".into();
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::UnsupportedFallbackLanguage { .. })
        ));
    }

    #[test]
    fn slow_debounce_only_warns() {
        let mut config = valid_config();
        config.search.debounce = Duration::from_secs(3);
        let warnings = apply_guard_rails(&config).unwrap();
        assert!(
            warnings
                .items
                .iter()
                .any(|w| w.message.contains("unresponsive"))
        );
    }
}
