use std::fmt;

use crate::model::record::Record;
use crate::parse::ParseWarning;
use crate::session::Mode;

/// Status line contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub mode: Mode,
    pub filename: String,
    /// Records in the store
    pub total: usize,
    /// Records in the filtered view
    pub matches: usize,
    /// 1-based position of the current record in the view, 0 when none
    pub position: usize,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mode: {} | File: {} | Lines: {} | Matches: {} | Current: {}",
            self.mode, self.filename, self.total, self.matches, self.position
        )
    }
}

/// Everything a UI needs to draw one frame.
///
/// Produced by `Session::view_model` after each action. Warnings, error and
/// notice are handed over once and then cleared from the session.
#[derive(Debug, Clone)]
pub struct ViewModel {
    pub status: Status,
    pub search_term: String,
    /// The filtered view, in store order
    pub records: Vec<Record>,
    /// Index into `records`
    pub current: Option<usize>,
    pub can_go_up: bool,
    pub can_go_down: bool,
    /// Form contents while creating or updating
    pub draft: Option<Record>,
    /// Record awaiting delete confirmation
    pub target: Option<Record>,
    pub warnings: Vec<ParseWarning>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl ViewModel {
    pub fn current_record(&self) -> Option<&Record> {
        self.current.and_then(|i| self.records.get(i))
    }
}
