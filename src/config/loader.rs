//! ConfigLoader: composes sources and deserializes to DesignConfig.

use super::{sources, DesignConfig};
use config::{Config, ConfigError, File, FileFormat};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    /// Precedence: global file (lowest) -> workspace file -> environment (highest).
    pub fn load(workspace_root: &Path) -> Result<DesignConfig, ConfigError> {
        let builder = Config::builder();
        let builder = sources::add_global_file(builder)?;
        let builder = sources::add_workspace_file(builder, workspace_root)?;
        let builder = sources::add_environment(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<DesignConfig, ConfigError> {
        let builder = Config::builder().add_source(File::from(path).format(FileFormat::Toml));
        let builder = sources::add_environment(builder)?;
        builder.build()?.try_deserialize()
    }
}
