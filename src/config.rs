use crate::types::BackgroundOptions;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "starglow";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid options in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize options: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Default options file: `<config_dir>/starglow/options.json`.
pub fn options_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join(APP_DIR).join("options.json")
}

/// Directory for log files: `<data_local_dir>/starglow/logs`.
pub fn log_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join(APP_DIR).join("logs")
}

/// Load options from `path`, returning defaults if the file is missing.
pub fn load_options(path: &Path) -> Result<BackgroundOptions, ConfigError> {
    if !path.exists() {
        return Ok(BackgroundOptions::default());
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Persist options to `path`, creating parent directories as needed.
pub fn save_options(path: &Path, options: &BackgroundOptions) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(options)?;
    fs::write(path, json).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
