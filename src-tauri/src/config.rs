//! Runtime configuration read from the environment.
//!
//! `.env` files are loaded first (app data dir, then the working directory) so
//! users can point the client at a backend without touching their shell.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

const CONFIG_KEYS: &[&str] = &["BACKEND_URL", "DOCINTEL_REQUEST_TIMEOUT_SECS"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BACKEND_URL must start with http:// or https:// (got \"{0}\")")]
    InvalidBackendUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backend origin without a trailing slash.
    pub backend_url: String,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Load `.env` from `app_data_dir` (if present) and the working directory, then read the process env.
    pub fn load(app_data_dir: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(dir) = app_data_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                if let Err(e) = dotenvy::from_path(&env_path) {
                    tracing::warn!("Could not load {}: {}", env_path.display(), e);
                }
            }
        }
        let _ = dotenvy::dotenv();
        Self::from_vars(&process_vars())
    }

    /// Build the config from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let backend_url = match vars.get("BACKEND_URL").map(|v| v.trim()) {
            Some(v) if !v.is_empty() => v.trim_end_matches('/').to_string(),
            _ => DEFAULT_BACKEND_URL.to_string(),
        };
        if !(backend_url.starts_with("http://") || backend_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBackendUrl(backend_url));
        }

        let timeout_secs = match vars.get("DOCINTEL_REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(
                        "Ignoring DOCINTEL_REQUEST_TIMEOUT_SECS={:?}, using {}s",
                        raw,
                        DEFAULT_TIMEOUT_SECS
                    );
                    DEFAULT_TIMEOUT_SECS
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            backend_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn process_url(&self) -> String {
        format!("{}/process", self.backend_url)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.backend_url)
    }
}

/// Only the keys we read; unrelated variables may not be valid UTF-8.
fn process_vars() -> HashMap<String, String> {
    CONFIG_KEYS
        .iter()
        .filter_map(|key| match std::env::var(key) {
            Ok(value) => Some((key.to_string(), value)),
            Err(std::env::VarError::NotUnicode(_)) => {
                tracing::warn!("Ignoring {}: value is not valid UTF-8", key);
                None
            }
            Err(std::env::VarError::NotPresent) => None,
        })
        .collect()
}
