//! Shared configuration library for Reelscope.
//!
//! Centralizes the configuration model, the layered loader (defaults, TOML
//! file, `.env` and `REELSCOPE_*` environment overrides) and the guard rails
//! that reject unusable settings before any network traffic happens.

#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigSource, error::ConfigLoadError};
pub use models::{
    AccessToken, CatalogConfig, PreferencesConfig, ReelscopeConfig,
    SearchConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
