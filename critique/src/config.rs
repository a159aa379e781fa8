//! User configuration for critique.
//!
//! Read from `$XDG_CONFIG_HOME/critique/config.toml` (falling back to
//! `~/.config/critique/config.toml`). Every key is optional and config errors
//! are soft failures: a missing or unparsable file yields the defaults and a
//! logged warning, never a refusal to start.
//!
//! ```toml
//! theme = "catppuccin-mocha"
//! endpoint = "https://review.example.com/v1/review"
//! api_key = "..."
//! default_model = "gpt-4o-mini"
//! timeout_secs = 90
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

/// Default request timeout for the review service.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default review service endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8787/review";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme name, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub theme: String,
    /// URL the review request is POSTed to.
    pub endpoint: String,
    /// Bearer token for the review service. Its presence signs the session in.
    pub api_key: Option<String>,
    /// Catalog id selected at start-up. Ignored if not in the catalog.
    pub default_model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            api_key: None,
            default_model: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Loads the config file, then applies `CRITIQUE_ENDPOINT` / `CRITIQUE_API_KEY`.
    pub fn load() -> Self {
        let mut config = Self::from_file(&config_path());
        config.apply_overrides(
            std::env::var("CRITIQUE_ENDPOINT").ok(),
            std::env::var("CRITIQUE_API_KEY").ok(),
        );
        config
    }

    /// Parses `path`, falling back to defaults when absent or invalid.
    pub fn from_file(path: &Path) -> Self {
        let raw = match read_config_file(path) {
            Ok(Some(s)) => s,
            Ok(None) => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
                return Self::default();
            }
        };
        match toml::from_str::<Config>(&raw) {
            Ok(config) => config.sanitized(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config parse error, using defaults");
                Self::default()
            }
        }
    }

    fn apply_overrides(&mut self, endpoint: Option<String>, api_key: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|s| !s.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(key) = api_key.filter(|s| !s.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    /// Blank keys count as absent; a zero timeout falls back to the default.
    fn sanitized(mut self) -> Self {
        self.api_key = self.api_key.filter(|k| !k.trim().is_empty());
        self.default_model = self.default_model.filter(|m| !m.trim().is_empty());
        if self.timeout_secs == 0 {
            self.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Reads the config file. A missing file is `Ok(None)`; any other failure
/// (permissions, non-UTF-8 contents) is an error for the caller to report.
fn read_config_file(path: &Path) -> std::io::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Returns the path to the critique config file.
///
/// Prefers `$XDG_CONFIG_HOME/critique/config.toml`; falls back to
/// `~/.config/critique/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("critique").join("config.toml")
}
