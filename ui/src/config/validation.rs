use super::app::AppConfig;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid api.timeout_secs: {configured} (min: {min_limit}, max: {max_limit})")]
    ApiTimeout {
        configured: u64,
        min_limit: u64,
        max_limit: u64,
    },
    #[error("Invalid api.base_url: {configured}")]
    BaseUrl { configured: String },
    #[error("Invalid logging.level: {configured}")]
    LogLevel { configured: String },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::ApiTimeout {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Request timeout out of range!\n\n\
                    Your configured value: {configured} seconds\n\
                    Valid range: {min_limit} - {max_limit} seconds\n\n\
                    Please update api.timeout_secs in config.toml or API__TIMEOUT_SECS."
                )
            }
            ConfigValidationError::BaseUrl { configured } => {
                format!(
                    "Backend URL is not a valid http(s) address!\n\n\
                    Your configured value: {configured}\n\
                    Example: http://localhost:8000\n\n\
                    Please update api.base_url in config.toml or API__BASE_URL."
                )
            }
            ConfigValidationError::LogLevel { configured } => {
                format!(
                    "Unknown log level!\n\n\
                    Your configured value: {configured}\n\
                    Valid levels: trace, debug, info, warn, error\n\n\
                    Please update logging.level in config.toml or LOGGING__LEVEL."
                )
            }
        }
    }
}

/// Configuration loading result
#[derive(Debug, Clone)]
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
}

impl ConfigLoadResult {
    pub fn config(&self) -> Result<&AppConfig, String> {
        match self {
            ConfigLoadResult::Success(config) => Ok(config),
            ConfigLoadResult::LoadError(msg) | ConfigLoadResult::DeserializeError(msg) => {
                Err(msg.clone())
            }
        }
    }
}
