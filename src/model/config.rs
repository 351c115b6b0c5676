use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Default data file name
pub const DEFAULT_FILENAME: &str = "timeline.csv";

/// Configuration from timeline.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Data file, relative to the working directory
    #[serde(default = "default_file")]
    pub file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_file(),
        }
    }
}

fn default_file() -> PathBuf {
    PathBuf::from(DEFAULT_FILENAME)
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Colors keyed by tag label, matched case-insensitively and without `#`
    #[serde(default)]
    pub tag_colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
            tag_colors: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory for TUI log files. None = platform data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}
