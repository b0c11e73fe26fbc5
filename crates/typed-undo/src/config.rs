/// Configuration for the history manager.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Number of edits remembered when nothing else is configured.
pub const DEFAULT_LIMIT: usize = 100;

/// Environment variable that overrides the default limit.
pub const LIMIT_ENV_VAR: &str = "TYPED_UNDO_LIMIT";

/// Configuration for an [`UndoManager`](crate::UndoManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of edits kept; the oldest are evicted first.
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

impl HistoryConfig {
    /// Resolves the configuration from the environment.
    ///
    /// Resolution order:
    /// 1. `TYPED_UNDO_LIMIT` environment variable, if it parses
    /// 2. [`DEFAULT_LIMIT`]
    pub fn resolve() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(LIMIT_ENV_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(limit) => config.limit = limit,
                Err(e) => tracing::warn!("Ignoring {LIMIT_ENV_VAR}={raw:?}: {e}"),
            }
        }
        config.sanitize();
        config
    }

    /// Loads a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read history config: {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse history config: {}", path.display()))?;
        config.sanitize();
        Ok(config)
    }

    /// Loads `path`, falling back to defaults on a missing or broken file.
    ///
    /// A broken file is logged and left untouched.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("No history config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{e:#}");
                Self::default()
            }
        }
    }

    /// Saves the config to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write history config: {}", path.display()))
    }

    /// Clamps values to valid ranges.
    pub fn sanitize(&mut self) {
        if self.limit == 0 {
            tracing::warn!("History limit of 0 is invalid, using 1");
            self.limit = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HistoryConfig::default();
        assert_eq!(config.limit, 100);
    }

    #[test]
    fn test_sanitize_clamps_zero_limit() {
        let mut config = HistoryConfig { limit: 0 };
        config.sanitize();
        assert_eq!(config.limit, 1);
    }

    #[test]
    fn test_sanitize_preserves_valid_limit() {
        let mut config = HistoryConfig { limit: 7 };
        config.sanitize();
        assert_eq!(config.limit, 7);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let parsed: HistoryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_resolve_with_env_var() {
        // Save and restore env var
        let original = std::env::var(LIMIT_ENV_VAR).ok();
        std::env::set_var(LIMIT_ENV_VAR, "12");
        assert_eq!(HistoryConfig::resolve().limit, 12);
        std::env::set_var(LIMIT_ENV_VAR, "not a number");
        assert_eq!(HistoryConfig::resolve().limit, DEFAULT_LIMIT);
        std::env::set_var(LIMIT_ENV_VAR, "0");
        assert_eq!(HistoryConfig::resolve().limit, 1);
        // Restore
        match original {
            Some(val) => std::env::set_var(LIMIT_ENV_VAR, val),
            None => std::env::remove_var(LIMIT_ENV_VAR),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        HistoryConfig { limit: 42 }.save(&path).unwrap();
        let loaded = HistoryConfig::load(&path).unwrap();
        assert_eq!(loaded.limit, 42);
    }

    #[test]
    fn test_load_broken_json_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = HistoryConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse history config"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let config = HistoryConfig::load_or_default(&path);
        assert_eq!(config, HistoryConfig::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_load_or_default_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ \"limit\": ").unwrap();
        let config = HistoryConfig::load_or_default(&path);
        assert_eq!(config, HistoryConfig::default());
        // Broken file is not overwritten
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ \"limit\": ");
    }

    #[test]
    fn test_load_or_default_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, r#"{"limit": 0}"#).unwrap();
        assert_eq!(HistoryConfig::load_or_default(&path).limit, 1);
    }
}
