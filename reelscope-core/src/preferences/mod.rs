//! Durable user preferences: interface language, recent searches and the
//! onboarding flag.
//!
//! Reads never fail: an unreadable or malformed value falls back to its
//! default and is logged. Mutations apply in memory first, then report a
//! persistence failure to the caller.

mod store;

use std::sync::Arc;

use reelscope_config::PreferencesConfig;
use reelscope_model::{DEFAULT_LANGUAGE_CODE, find_language};
use thiserror::Error;
use tracing::{info, warn};

use crate::observable::{Observable, Subscription};

pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};

pub const LANGUAGE_KEY: &str = "preferredLanguage";
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";
pub const ONBOARDING_KEY: &str = "hasVisitedOnboarding";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("language `{0}` is not supported")]
    UnsupportedLanguage(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceSnapshot {
    pub language: String,
    /// Most recent first, no case-insensitive duplicates.
    pub recent_searches: Vec<String>,
    pub has_visited_onboarding: bool,
}

#[derive(Debug)]
pub struct PreferenceStore {
    backend: Arc<dyn KeyValueStore>,
    fallback_language: String,
    history_limit: usize,
    state: Observable<PreferenceSnapshot>,
}

impl PreferenceStore {
    pub fn open(
        backend: Arc<dyn KeyValueStore>,
        fallback_language: &str,
        history_limit: usize,
    ) -> Self {
        let fallback_language = find_language(fallback_language)
            .map(|language| language.code)
            .unwrap_or(DEFAULT_LANGUAGE_CODE)
            .to_string();
        let history_limit = history_limit.max(1);

        let language = read_value(backend.as_ref(), LANGUAGE_KEY)
            .and_then(|code| match find_language(&code) {
                Some(language) => Some(language.code.to_string()),
                None => {
                    warn!(%code, "stored language is not supported; using fallback");
                    None
                }
            })
            .unwrap_or_else(|| fallback_language.clone());

        let stored: Vec<String> = read_value(backend.as_ref(), RECENT_SEARCHES_KEY)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(list) => Some(list),
                Err(err) => {
                    warn!(error = %err, "stored search history is malformed; ignoring it");
                    None
                }
            })
            .unwrap_or_default();
        let recent_searches = tidy_history(stored, history_limit);

        let has_visited_onboarding = read_value(backend.as_ref(), ONBOARDING_KEY)
            .is_some_and(|raw| raw == "true");

        Self {
            backend,
            fallback_language,
            history_limit,
            state: Observable::new(PreferenceSnapshot {
                language,
                recent_searches,
                has_visited_onboarding,
            }),
        }
    }

    /// File-backed store at the configured path, or an in-memory one when
    /// the platform has no config directory.
    pub fn from_config(config: &PreferencesConfig) -> Self {
        let backend: Arc<dyn KeyValueStore> = match config.resolved_path() {
            Some(path) => match JsonFileStore::open_or_reset(&path) {
                Ok(store) => Arc::new(store),
                Err(err) => {
                    warn!(error = %err, "preferences unavailable; changes will not persist");
                    Arc::new(MemoryStore::new())
                }
            },
            None => Arc::new(MemoryStore::new()),
        };
        Self::open(backend, &config.fallback_language, config.history_limit)
    }

    pub fn subscribe(&self) -> Subscription<PreferenceSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> PreferenceSnapshot {
        self.state.snapshot()
    }

    pub fn language(&self) -> String {
        self.state.read(|state| state.language.clone())
    }

    /// Returns the canonical code that is now active.
    pub fn set_language(&self, code: &str) -> Result<String, PreferenceError> {
        let language = find_language(code)
            .ok_or_else(|| PreferenceError::UnsupportedLanguage(code.trim().to_string()))?;
        let code = language.code.to_string();

        self.state.update_if(|state| {
            if state.language == code {
                return false;
            }
            state.language = code.clone();
            true
        });
        info!(language = %code, "interface language set");
        self.backend.set(LANGUAGE_KEY, &code)?;
        Ok(code)
    }

    pub fn recent_searches(&self) -> Vec<String> {
        self.state.read(|state| state.recent_searches.clone())
    }

    /// Records a submitted query. Blank input is ignored and returns `false`.
    pub fn record_search(&self, query: &str) -> Result<bool, PreferenceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(false);
        }
        let limit = self.history_limit;
        let mut history = Vec::new();
        self.state.update(|state| {
            push_recent(&mut state.recent_searches, query, limit);
            history = state.recent_searches.clone();
        });
        self.persist_history(&history)?;
        Ok(true)
    }

    /// Removes every entry equal to `query`, ignoring case.
    pub fn remove_search(&self, query: &str) -> Result<bool, PreferenceError> {
        let needle = query.trim().to_lowercase();
        let mut history = None;
        self.state.update_if(|state| {
            let before = state.recent_searches.len();
            state
                .recent_searches
                .retain(|entry| entry.to_lowercase() != needle);
            if state.recent_searches.len() == before {
                return false;
            }
            history = Some(state.recent_searches.clone());
            true
        });
        match history {
            Some(history) => {
                self.persist_history(&history)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn clear_searches(&self) -> Result<(), PreferenceError> {
        self.state.update_if(|state| {
            let changed = !state.recent_searches.is_empty();
            state.recent_searches.clear();
            changed
        });
        self.backend.remove(RECENT_SEARCHES_KEY)?;
        Ok(())
    }

    pub fn has_visited_onboarding(&self) -> bool {
        self.state.read(|state| state.has_visited_onboarding)
    }

    pub fn mark_onboarding_visited(&self) -> Result<(), PreferenceError> {
        self.state.update_if(|state| {
            let changed = !state.has_visited_onboarding;
            state.has_visited_onboarding = true;
            changed
        });
        self.backend.set(ONBOARDING_KEY, "true")?;
        Ok(())
    }

    fn persist_history(&self, history: &[String]) -> Result<(), PreferenceError> {
        let encoded = serde_json::to_string(history).map_err(|err| {
            StorageError::Unavailable(format!("could not encode history: {err}"))
        })?;
        self.backend.set(RECENT_SEARCHES_KEY, &encoded)?;
        Ok(())
    }
}

fn read_value(backend: &dyn KeyValueStore, key: &str) -> Option<String> {
    match backend.get(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "failed to read preference; using default");
            None
        }
    }
}

/// Inserts `entry` at the front, dropping case-insensitive duplicates and
/// anything past `limit`.
fn push_recent(history: &mut Vec<String>, entry: &str, limit: usize) {
    let lowered = entry.to_lowercase();
    history.retain(|existing| existing.to_lowercase() != lowered);
    history.insert(0, entry.to_string());
    history.truncate(limit);
}

/// Applies the [`push_recent`] rules to a stored list: entries are trimmed,
/// blanks dropped and only the first of any case-insensitive duplicates kept.
fn tidy_history(stored: Vec<String>, limit: usize) -> Vec<String> {
    let mut history: Vec<String> = Vec::with_capacity(stored.len().min(limit));
    for entry in stored {
        if history.len() == limit {
            break;
        }
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let lowered = entry.to_lowercase();
        if history.iter().any(|kept| kept.to_lowercase() == lowered) {
            continue;
        }
        history.push(entry.to_string());
    }
    history
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PreferenceStore {
        PreferenceStore::open(Arc::new(MemoryStore::new()), "tr-TR", 10)
    }

    #[test]
    fn push_recent_moves_duplicates_to_front() {
        let mut history = vec!["Dune".to_string(), "batman".to_string()];
        push_recent(&mut history, "Batman", 10);
        assert_eq!(history, vec!["Batman", "Dune"]);
    }

    #[test]
    fn history_is_capped() {
        let prefs = store();
        for i in 0..11 {
            prefs.record_search(&format!("query {i}")).unwrap();
        }
        let recent = prefs.recent_searches();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0], "query 10");
        assert!(!recent.contains(&"query 0".to_string()));
    }

    #[test]
    fn blank_queries_are_not_recorded() {
        let prefs = store();
        assert!(!prefs.record_search("   ").unwrap());
        assert!(prefs.recent_searches().is_empty());
    }

    #[test]
    fn remove_ignores_case() {
        let prefs = store();
        prefs.record_search("Batman").unwrap();
        prefs.record_search("Dune").unwrap();
        assert!(prefs.remove_search("BATMAN").unwrap());
        assert_eq!(prefs.recent_searches(), vec!["Dune"]);
        assert!(!prefs.remove_search("Alien").unwrap());
    }

    #[test]
    fn unsupported_language_is_rejected() {
        let prefs = store();
        assert!(matches!(
            prefs.set_language("xx-XX"),
            Err(PreferenceError::UnsupportedLanguage(code)) if code == "xx-XX"
        ));
        assert_eq!(prefs.language(), "tr-TR");
        assert_eq!(prefs.set_language("en-us").unwrap(), "en-US");
    }

    #[test]
    fn stored_history_is_tidied_on_open() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set(RECENT_SEARCHES_KEY, r#"["Batman","batman","  ","dune"," Alien "]"#)
            .unwrap();
        let prefs = PreferenceStore::open(backend, "tr-TR", 2);
        assert_eq!(prefs.recent_searches(), vec!["Batman", "dune"]);
    }

    #[test]
    fn unknown_stored_language_falls_back() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(LANGUAGE_KEY, "klingon").unwrap();
        let prefs = PreferenceStore::open(backend, "en-US", 10);
        assert_eq!(prefs.language(), "en-US");
    }
}
