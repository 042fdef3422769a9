//! XDG and platform directories

use crate::error::ApiError;
use std::path::PathBuf;

/// `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`.
pub fn config_home() -> Result<PathBuf, ApiError> {
    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").map_err(|_| {
        ApiError::ConfigError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;
    Ok(PathBuf::from(home).join(".config"))
}

/// `$XDG_CONFIG_HOME/menugraft/config.toml`
pub fn global_config_file() -> Result<PathBuf, ApiError> {
    Ok(config_home()?.join("menugraft").join("config.toml"))
}

/// `store` under the platform data directory
pub fn default_store_path() -> Result<PathBuf, ApiError> {
    let dirs = directories::ProjectDirs::from("", "menugraft", "menugraft").ok_or_else(|| {
        ApiError::ConfigError("Could not determine platform data directory".to_string())
    })?;
    Ok(dirs.data_dir().join("store"))
}
