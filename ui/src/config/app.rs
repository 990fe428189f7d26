use super::{
    LoggingConfig,
    defaults::{DEFAULT_API_TIMEOUT_SECS, DEFAULT_BASE_URL},
    limits::*,
    validation::ConfigValidationError,
};
use nimbus_client::auth::FileSessionStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    api: ApiConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    storage: StorageConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl ApiConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_API_TIMEOUT_SECS)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs())
    }
}

/// Session storage settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    session_file: Option<PathBuf>,
}

impl StorageConfig {
    pub fn session_file(&self) -> Option<&Path> {
        self.session_file.as_deref()
    }
}

/// Resolved values, as the application will use them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub api: EffectiveApi,
    pub logging: EffectiveLogging,
    pub storage: EffectiveStorage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveApi {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveLogging {
    pub level: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveStorage {
    pub session_file: String,
}

impl AppConfig {
    /// Validate the configuration against defined limits
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        let timeout = self.api.timeout_secs();
        if !(MIN_API_TIMEOUT_SECS..=MAX_API_TIMEOUT_SECS).contains(&timeout) {
            errors.push(ConfigValidationError::ApiTimeout {
                configured: timeout,
                min_limit: MIN_API_TIMEOUT_SECS,
                max_limit: MAX_API_TIMEOUT_SECS,
            });
        }

        let base_url = self.api.base_url();
        if !is_http_url(base_url) {
            errors.push(ConfigValidationError::BaseUrl {
                configured: base_url.to_string(),
            });
        }

        let level = self.logging.level().to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::LogLevel {
                configured: self.logging.level().to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// Session file location, falling back to the per-user config directory.
    pub fn session_file(&self) -> Option<PathBuf> {
        match self.storage.session_file() {
            Some(path) => Some(path.to_path_buf()),
            None => FileSessionStore::default_location()
                .ok()
                .map(|store| store.path().to_path_buf()),
        }
    }

    pub fn effective(&self) -> EffectiveConfig {
        EffectiveConfig {
            api: EffectiveApi {
                base_url: self.api.base_url().to_string(),
                timeout_secs: self.api.timeout_secs(),
            },
            logging: EffectiveLogging {
                level: self.logging.level().to_string(),
                file: self.logging.file_or_default().to_string(),
            },
            storage: EffectiveStorage {
                session_file: self
                    .session_file()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "<unavailable>".to_string()),
            },
        }
    }
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !host.contains(char::is_whitespace)
        }
        None => false,
    }
}
