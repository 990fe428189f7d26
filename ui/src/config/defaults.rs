/// Default configuration file embedded in the binary
pub const DEFAULT_CONFIG: &str = include_str!("../../../config.default.toml");

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FILE: &str = "nimbus.log";
