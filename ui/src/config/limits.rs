/// Minimum request timeout for backend calls
pub const MIN_API_TIMEOUT_SECS: u64 = 1;

/// Maximum reasonable request timeout for backend calls (5 minutes)
pub const MAX_API_TIMEOUT_SECS: u64 = 300;

/// Log levels accepted by the logger
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
