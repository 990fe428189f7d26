use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;

pub mod app;
pub mod defaults;
pub mod limits;
pub mod validation;

pub use app::{AppConfig, EffectiveConfig};
pub use validation::{ConfigLoadResult, ConfigValidationError};

/// Global configuration, loaded once per process
static CONFIG: OnceLock<ConfigLoadResult> = OnceLock::new();

fn load_config(path: Option<&Path>) -> ConfigLoadResult {
    dotenv::dotenv().ok();

    // An explicit path must exist; the default config.toml is optional.
    let file_source = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(defaults::CONFIG_FILE_NAME).required(false),
    };

    let config = match Config::builder()
        .add_source(file_source)
        .add_source(Environment::default().separator("__"))
        .build()
    {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. Please check your config.toml file and environment variables."
            ));
        }
    };

    deserialize(config)
}

fn deserialize(config: Config) -> ConfigLoadResult {
    match config.try_deserialize::<AppConfig>() {
        Ok(app_config) => ConfigLoadResult::Success(Box::new(app_config)),
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

/// Parse configuration from TOML text only, ignoring files and the environment.
pub fn parse_config(contents: &str) -> ConfigLoadResult {
    match Config::builder()
        .add_source(File::from_str(contents, FileFormat::Toml))
        .build()
    {
        Ok(config) => deserialize(config),
        Err(e) => ConfigLoadResult::LoadError(format!("Configuration loading failed: {e}")),
    }
}

/// Load the configuration on first use. Later calls return the same result
/// and ignore `path`.
pub fn init_config(path: Option<&Path>) -> &'static ConfigLoadResult {
    CONFIG.get_or_init(|| load_config(path))
}

pub fn get_config() -> &'static ConfigLoadResult {
    init_config(None)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(defaults::DEFAULT_LOG_LEVEL)
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn file_or_default(&self) -> &str {
        self.file().unwrap_or(defaults::DEFAULT_LOG_FILE)
    }
}
