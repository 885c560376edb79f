//! Path management for todos configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/todos/             # Config directory (platform config dir)
//! └── config.toml              # Optional client configuration
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "todos";
const CONFIG_FILE: &str = "config.toml";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves where the client keeps its configuration.
///
/// A base path overrides the platform directory (used by tests).
#[derive(Debug, Clone, Default)]
pub struct TodosPaths {
    base: Option<PathBuf>,
}

impl TodosPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the todos configuration directory (e.g. `~/.config/todos/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the path of `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_overrides_platform_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = TodosPaths::new(Some(temp_dir.path()));

        assert_eq!(paths.config_dir().unwrap(), temp_dir.path());
        assert_eq!(
            paths.config_file().unwrap(),
            temp_dir.path().join("config.toml")
        );
    }
}
