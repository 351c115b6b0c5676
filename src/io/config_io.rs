use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Config file looked up in the working directory
pub const LOCAL_CONFIG: &str = "timeline.toml";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Resolve which config file applies.
///
/// An explicit path wins; then `./timeline.toml`; then the user config dir.
/// Returns None when nothing exists, in which case defaults apply.
pub fn config_path(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = cwd.join(LOCAL_CONFIG);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("timeline").join("config.toml"))
        .filter(|p| p.is_file())
}

/// Read and parse a config file.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the effective config (defaults when no file applies).
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config, ConfigError> {
    match config_path(explicit, cwd) {
        Some(path) => {
            let config = read_config(&path)?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

/// Data file to open: `--file` beats the configured `store.file`.
/// Relative config paths are taken relative to `cwd`.
pub fn resolve_data_file(cli_file: Option<&Path>, config: &Config, cwd: &Path) -> PathBuf {
    let file = cli_file.unwrap_or(&config.store.file);
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        cwd.join(file)
    }
}

/// Directory for TUI log files
pub fn log_dir(config: &Config) -> Option<PathBuf> {
    config
        .log
        .dir
        .clone()
        .or_else(|| dirs::data_local_dir().map(|d| d.join("timeline").join("logs")))
}
