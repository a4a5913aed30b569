//! Gateway configuration.
//!
//! # Responsibility
//! - Resolve the store file location and lock wait for the gateway.
//!
//! # Invariants
//! - Blank environment values are ignored and fall back to defaults.

use crate::db::DEFAULT_BUSY_TIMEOUT;
use std::path::PathBuf;
use std::time::Duration;

/// Store file used when nothing else is configured, relative to the working directory.
pub const DEFAULT_DB_FILE_NAME: &str = "library.db";
pub const DB_PATH_ENV: &str = "BOOKLIB_DB_PATH";
pub const BUSY_TIMEOUT_ENV: &str = "BOOKLIB_BUSY_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub db_path: PathBuf,
    pub busy_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_FILE_NAME)
    }
}

impl GatewayConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// Builds a config from `BOOKLIB_DB_PATH` and `BOOKLIB_BUSY_TIMEOUT_MS`.
    ///
    /// Unparseable timeout values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(DB_PATH_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                config.db_path = PathBuf::from(trimmed);
            }
        }

        if let Some(raw) = lookup(BUSY_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.busy_timeout = Duration::from_millis(ms),
                Err(_) if raw.trim().is_empty() => {}
                Err(err) => log::warn!(
                    "event=config_load module=config status=ignored key={} error={}",
                    BUSY_TIMEOUT_ENV,
                    err
                ),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::{GatewayConfig, BUSY_TIMEOUT_ENV, DB_PATH_ENV, DEFAULT_DB_FILE_NAME};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_library_db_in_working_directory() {
        let config = GatewayConfig::from_lookup(lookup(&[]));
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn env_values_override_defaults() {
        let config = GatewayConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, " /var/lib/books.db "),
            (BUSY_TIMEOUT_ENV, "250"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/var/lib/books.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
    }

    #[test]
    fn blank_or_invalid_values_are_ignored() {
        let config = GatewayConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, "   "),
            (BUSY_TIMEOUT_ENV, "soon"),
        ]));
        assert_eq!(config, GatewayConfig::default());
    }
}
