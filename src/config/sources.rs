//! Config sources: global file, workspace file and environment overlay.

use crate::config::paths;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};
use std::path::Path;

/// Workspace-local config file name
pub const WORKSPACE_FILE: &str = "design-tree.toml";

/// Environment prefix; nested keys use `__`, e.g. `DESIGN_TREE__SESSION__HISTORY_LIMIT`
pub const ENV_PREFIX: &str = "DESIGN_TREE";

/// Add the global config file if present.
pub fn add_global_file(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match paths::global_config_file() {
        Ok(path) => Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(false))),
        Err(e) => {
            tracing::debug!("No global config location: {}", e);
            Ok(builder)
        }
    }
}

/// Add `<workspace>/design-tree.toml` if present.
pub fn add_workspace_file(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = workspace_root.join(WORKSPACE_FILE);
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(false)))
}

/// Add the environment overlay.
pub fn add_environment(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    ))
}
