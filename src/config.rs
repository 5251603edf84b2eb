//! Training settings persisted as TOML in the application directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, de::Error as SerdeDeError};
use thiserror::Error;

use crate::app_dirs::{AppDirError, AppDirs};
use crate::ml::logistic::{DEFAULT_EPSILON, DEFAULT_STEP_SIZE, TrainOptions};

pub use crate::app_dirs::CONFIG_FILE_NAME;
/// Iteration budget used when neither the config nor the CLI sets one.
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000_000;
/// Seed used for parameter initialization unless overridden.
pub const DEFAULT_SEED: u64 = 42;

/// Top-level layout of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub training: TrainingSettings,
}

/// Gradient-ascent settings applied to every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSettings {
    /// Convergence tolerance on the change in cost between iterations.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Step size before the `1/sqrt(t)` decay.
    #[serde(default = "default_step_size")]
    pub initial_step_size: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Seed for the random starting parameters.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            initial_step_size: default_step_size(),
            max_iterations: default_max_iterations(),
            seed: default_seed(),
        }
    }
}

impl TrainingSettings {
    pub fn train_options(&self) -> TrainOptions {
        TrainOptions {
            epsilon: self.epsilon,
            initial_step_size: self.initial_step_size,
        }
    }
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

fn default_step_size() -> f64 {
    DEFAULT_STEP_SIZE
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Errors that may occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    #[error(transparent)]
    AppDir(#[from] AppDirError),
}

/// Resolve the configuration file path inside the application directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(AppDirs::resolve()?.config_file())
}

/// Load configuration from the application directory, or defaults if missing.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    load_in(&AppDirs::resolve()?)
}

/// Load the settings file of an already resolved application folder.
pub fn load_in(dirs: &AppDirs) -> Result<AppConfig, ConfigError> {
    load_from_path(&dirs.config_file())
}

/// Load configuration from `path`, returning defaults if the file is missing.
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}; using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: SerdeDeError::custom(source),
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Save configuration to `path`, creating parent directories as needed.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(config).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_from_path(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.training.epsilon, 1e-10);
        assert_eq!(config.training.initial_step_size, 0.01);
    }

    #[test]
    fn partial_training_table_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[training]\nepsilon = 1e-6\nseed = 7\n").unwrap();
        let config = load_from_path(&path).unwrap();
        assert_eq!(config.training.epsilon, 1e-6);
        assert_eq!(config.training.seed, 7);
        assert_eq!(config.training.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.training.initial_step_size, DEFAULT_STEP_SIZE);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut config = AppConfig::default();
        config.training.max_iterations = 250;
        config.training.initial_step_size = 0.5;
        save_to_path(&config, &path).unwrap();
        assert_eq!(load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn invalid_toml_names_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[training\n").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn app_folder_settings_are_read_from_config_file() {
        let base = tempdir().unwrap();
        let dirs = AppDirs::under(base.path());
        assert_eq!(load_in(&dirs).unwrap(), AppConfig::default());

        let mut config = AppConfig::default();
        config.training.seed = 99;
        save_to_path(&config, &dirs.config_file()).unwrap();
        assert_eq!(load_in(&dirs).unwrap().training.seed, 99);
    }

    #[test]
    fn settings_convert_to_train_options() {
        let settings = TrainingSettings {
            epsilon: 0.5,
            initial_step_size: 0.25,
            ..TrainingSettings::default()
        };
        let options = settings.train_options();
        assert_eq!(options.epsilon, 0.5);
        assert_eq!(options.initial_step_size, 0.25);
    }
}
