//! Environment lookup
//!
//! Configuration is read through [`EnvSource`] so it can be built from the
//! process environment in the binary and from a plain map in tests.

use std::collections::HashMap;
use std::path::PathBuf;

/// Read-only source of configuration variables
pub trait EnvSource {
    /// Value of `key`, or `None` when unset
    fn var(&self, key: &str) -> Option<String>;

    /// Value of `key`, or `default` when unset
    fn var_or(&self, key: &str, default: &str) -> String {
        self.var(key).unwrap_or_else(|| default.to_string())
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory variables
#[derive(Debug, Clone, Default)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// Load a `.env` file from the working directory or its parents, if present.
///
/// Returns the path that was loaded, or `None` when there is no file. This
/// usually runs before logging is installed, so failures are handed back to
/// the caller instead of logged here.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    found_or_absent(dotenvy::dotenv())
}

fn found_or_absent(
    result: Result<PathBuf, dotenvy::Error>,
) -> Result<Option<PathBuf>, dotenvy::Error> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_lookup() {
        let env = MapEnv::new().with("NEWS_API_KEY", "abc");
        assert_eq!(env.var("NEWS_API_KEY").as_deref(), Some("abc"));
        assert_eq!(env.var("MISSING"), None);
    }

    #[test]
    fn test_var_or_default() {
        let env = MapEnv::new();
        assert_eq!(env.var_or("STOCK_ALERT_FAILURE_POLICY", "abort"), "abort");
    }

    #[test]
    fn test_missing_dotenv_is_not_an_error() {
        let missing = dotenvy::Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no .env",
        ));
        assert_eq!(found_or_absent(Err(missing)).unwrap(), None);
    }

    #[test]
    fn test_malformed_dotenv_is_reported() {
        let bad = dotenvy::Error::LineParse("NEWS_API_KEY abc".to_string(), 13);
        assert!(found_or_absent(Err(bad)).is_err());
    }

    #[test]
    fn test_loaded_dotenv_path() {
        let path = PathBuf::from("/srv/alerts/.env");
        assert_eq!(found_or_absent(Ok(path.clone())).unwrap(), Some(path));
    }
}
