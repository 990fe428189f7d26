use crate::app::Output;
use crate::config::AppConfig;
use crate::config::defaults::{CONFIG_FILE_NAME, DEFAULT_CONFIG};
use crate::error::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Prints the configuration with defaults filled in.
pub fn show(config: &AppConfig, output: Output) -> AppResult<()> {
    let effective = config.effective();
    output.emit(&effective, |effective| {
        toml::to_string_pretty(effective)
            .unwrap_or_else(|e| format!("Failed to render configuration: {e}"))
    })
}

/// Creates `config.toml` in the working directory. Runs before configuration
/// is loaded so a broken file can be replaced.
pub fn init(force: bool, output: Output) -> AppResult<()> {
    let path = write_default_config(Path::new("."), force)?;
    output.message(&format!("Wrote {}", path.display()))
}

/// Writes the commented default configuration into `dir`.
///
/// An existing file is kept unless `force` is set.
pub fn write_default_config(dir: &Path, force: bool) -> AppResult<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        return Err(AppError::Config(format!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        )));
    }

    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| AppError::Config(format!("Failed to write {}: {e}", path.display())))?;
    log::info!("Wrote default configuration to {}", path.display());
    Ok(path)
}
