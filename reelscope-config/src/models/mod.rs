use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reelscope_model::DEFAULT_LANGUAGE_CODE;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

mod duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelscopeConfig {
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub preferences: PreferencesConfig,
}

/// Connection settings for the upstream catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub api_base_url: String,
    pub image_base_url: String,
    /// Bearer credential sent with every request
    pub access_token: AccessToken,
    #[serde(with = "duration")]
    pub request_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            access_token: AccessToken::default(),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Live search tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period required before a typed query is sent
    #[serde(with = "duration")]
    pub debounce: Duration,
    /// Queries shorter than this (after trimming) never reach the network
    pub min_query_chars: usize,
    /// Number of suggestions kept from the first result page
    pub suggestion_limit: usize,
    /// Keep people in full search results
    pub include_people: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_chars: 2,
            suggestion_limit: 5,
            include_people: false,
        }
    }
}

/// Local preference persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    /// Explicit preference file; defaults to the platform config directory
    pub path: Option<PathBuf>,
    pub fallback_language: String,
    pub history_limit: usize,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: None,
            fallback_language: DEFAULT_LANGUAGE_CODE.to_string(),
            history_limit: 10,
        }
    }
}

impl PreferencesConfig {
    /// Resolved preference file location, if one can be determined.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join("reelscope").join("preferences.json"))
        })
    }
}

/// API credential. Wiped from memory on drop and never printed.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("AccessToken(<unset>)")
        } else {
            f.write_str("AccessToken(<redacted>)")
        }
    }
}
