//! Platform directories for config, data and state.

use crate::error::ApiError;
use std::path::PathBuf;

pub const APP_NAME: &str = "design-tree";

fn project_dirs() -> Result<directories::ProjectDirs, ApiError> {
    directories::ProjectDirs::from("", "", APP_NAME).ok_or_else(|| {
        ApiError::ConfigError("Could not determine platform directories (HOME not set)".to_string())
    })
}

/// Config home: `$XDG_CONFIG_HOME/design-tree` if set, otherwise the platform default
pub fn config_dir() -> Result<PathBuf, ApiError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join(APP_NAME));
        }
    }
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Data home: `$XDG_DATA_HOME/design-tree` if set, otherwise the platform default
pub fn data_dir() -> Result<PathBuf, ApiError> {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join(APP_NAME));
        }
    }
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// State directory used for logs; falls back to the data dir on platforms without one
pub fn state_dir() -> Result<PathBuf, ApiError> {
    let dirs = project_dirs()?;
    Ok(dirs
        .state_dir()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| dirs.data_dir().to_path_buf()))
}

/// Global config file path
pub fn global_config_file() -> Result<PathBuf, ApiError> {
    Ok(config_dir()?.join("config.toml"))
}
