//! Where `logit-fisher` keeps its settings file and run logs.
//!
//! Everything lives in one `.logit-fisher` folder. The folder sits under the
//! OS config root unless `LOGIT_FISHER_CONFIG_HOME` names another base.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use directories::BaseDirs;
use thiserror::Error;

/// Folder created under the base directory.
pub const APP_DIR_NAME: &str = ".logit-fisher";
/// Environment variable that replaces the OS config root as the base.
pub const CONFIG_HOME_ENV: &str = "LOGIT_FISHER_CONFIG_HOME";
/// Settings file inside the application folder.
pub const CONFIG_FILE_NAME: &str = "config.toml";
const LOGS_DIR_NAME: &str = "logs";

/// Errors that can occur while resolving or preparing application directories.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// Neither the override variable nor the OS provided a base directory.
    #[error("No base directory: set {CONFIG_HOME_ENV} or provide an OS config directory")]
    NoBaseDir,
    /// A directory under the application folder could not be created.
    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolved application folder. Paths are computed, not created, until a
/// caller asks for a directory it is about to write into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    root: PathBuf,
}

impl AppDirs {
    /// Resolve the folder from the environment and the OS config root.
    pub fn resolve() -> Result<Self, AppDirError> {
        let os_config = BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf());
        base_dir(std::env::var_os(CONFIG_HOME_ENV), os_config)
            .map(|base| Self::under(&base))
            .ok_or(AppDirError::NoBaseDir)
    }

    /// Use `base` as the parent of the application folder.
    pub fn under(base: &Path) -> Self {
        Self {
            root: base.join(APP_DIR_NAME),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Run log directory, created on demand.
    pub fn logs_dir(&self) -> Result<PathBuf, AppDirError> {
        let path = self.root.join(LOGS_DIR_NAME);
        std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// An empty override counts as unset.
fn base_dir(env_override: Option<OsString>, os_config: Option<PathBuf>) -> Option<PathBuf> {
    env_override
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or(os_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn override_wins_over_os_config() {
        let base = base_dir(
            Some(OsString::from("/portable")),
            Some(PathBuf::from("/home/u/.config")),
        );
        assert_eq!(base, Some(PathBuf::from("/portable")));
    }

    #[test]
    fn empty_override_falls_back_to_os_config() {
        let base = base_dir(Some(OsString::new()), Some(PathBuf::from("/home/u/.config")));
        assert_eq!(base, Some(PathBuf::from("/home/u/.config")));
        assert_eq!(base_dir(None, None), None);
    }

    #[test]
    fn logs_dir_is_created_inside_root() {
        let base = tempdir().unwrap();
        let dirs = AppDirs::under(base.path());
        assert_eq!(dirs.root(), base.path().join(APP_DIR_NAME));
        assert_eq!(dirs.config_file(), dirs.root().join("config.toml"));
        assert!(!dirs.root().exists());

        let logs = dirs.logs_dir().unwrap();
        assert_eq!(logs, dirs.root().join("logs"));
        assert!(logs.is_dir());
    }
}
