//! Storage location for the sled database.

use crate::config::paths;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database directory; relative paths resolve against the workspace root.
    /// Unset means `<data dir>/store`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolve_path(&self, workspace_root: &Path) -> Result<PathBuf, ApiError> {
        match &self.path {
            Some(path) if path.is_absolute() => Ok(path.clone()),
            Some(path) => Ok(workspace_root.join(path)),
            None => Ok(paths::data_dir()?.join("store")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_joins_workspace() {
        let config = StorageConfig {
            path: Some(PathBuf::from("db")),
        };
        assert_eq!(
            config.resolve_path(Path::new("/work")).unwrap(),
            PathBuf::from("/work/db")
        );
    }

    #[test]
    fn test_absolute_path_kept() {
        let config = StorageConfig {
            path: Some(PathBuf::from("/var/lib/designs")),
        };
        assert_eq!(
            config.resolve_path(Path::new("/work")).unwrap(),
            PathBuf::from("/var/lib/designs")
        );
    }

    #[test]
    fn test_default_under_data_dir() {
        let path = StorageConfig::default().resolve_path(Path::new("/work")).unwrap();
        assert!(path.ends_with("store"));
    }
}
