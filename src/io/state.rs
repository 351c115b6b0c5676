use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::io::recovery::sibling_dir;

/// Maximum number of remembered search terms
pub const MAX_SEARCH_HISTORY: usize = 200;

/// Persisted TUI state, kept beside the data file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Search term active when the TUI last exited
    #[serde(default)]
    pub last_search: Option<String>,
    /// Search history (most recent first)
    #[serde(default)]
    pub search_history: Vec<String>,
}

impl UiState {
    /// Record a search term at the front of the history, without duplicates.
    pub fn remember_search(&mut self, term: &str) {
        if term.is_empty() {
            return;
        }
        self.search_history.retain(|t| t != term);
        self.search_history.insert(0, term.to_string());
        self.search_history.truncate(MAX_SEARCH_HISTORY);
    }
}

/// `timeline.csv` → `.timeline.csv.state.json`
pub fn state_path(data_file: &Path) -> PathBuf {
    let name = data_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    sibling_dir(data_file).join(format!(".{}.state.json", name))
}

/// Read the state file for `data_file`
pub fn read_ui_state(data_file: &Path) -> Option<UiState> {
    let content = fs::read_to_string(state_path(data_file)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write the state file for `data_file`
pub fn write_ui_state(data_file: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(state_path(data_file), content)
}
