//! Interaction state for one editing session.
//!
//! A `Session` owns the loaded [`RecordStore`] plus everything the user is
//! doing with it: the mode, the search term, the filtered view and the
//! current selection. UIs call one action method per user action and then
//! ask for a [`ViewModel`] to draw.

pub mod view;

use std::fmt;
use std::path::Path;

use crate::io::recovery;
use crate::io::store_io::StoreError;
use crate::model::record::Record;
use crate::model::store::RecordStore;
use crate::ops::export::clipboard_text;
use crate::ops::record_ops::{self, RecordError, ValidationError};
use crate::ops::search;
use crate::parse::ParseWarning;

pub use view::{Status, ViewModel};

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Reading, searching and navigating
    #[default]
    Browse,
    /// Form open for a new record
    Create,
    /// Form open for the current record
    Update,
    /// Asking to delete the current record
    Delete,
    /// Asking to reload from disk
    Confirm,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mode::Browse => "browse",
            Mode::Create => "create",
            Mode::Update => "update",
            Mode::Delete => "delete",
            Mode::Confirm => "confirm",
        };
        f.write_str(label)
    }
}

/// Navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Home,
    End,
}

/// Errors surfaced to the user by a session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("no record selected")]
    NoSelection,
}

impl From<RecordError> for SessionError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::Invalid(v) => SessionError::Invalid(v),
            RecordError::NotFound(_) => SessionError::NoSelection,
        }
    }
}

pub struct Session {
    store: RecordStore,
    mode: Mode,
    search_term: String,
    /// Store indices of records matching `search_term`
    filtered: Vec<usize>,
    /// Index into `filtered`
    current: Option<usize>,
    draft: Option<Record>,
    /// Store index being updated or deleted
    target: Option<usize>,
    warnings: Vec<ParseWarning>,
    error: Option<SessionError>,
    notice: Option<String>,
}

impl Session {
    /// Load `path` (creating it if missing) and start browsing it.
    pub fn open(path: &Path) -> Result<Session, StoreError> {
        let (store, warnings) = RecordStore::open(path)?;
        Ok(Session::from_store(store, warnings))
    }

    pub fn from_store(store: RecordStore, warnings: Vec<ParseWarning>) -> Session {
        let mut session = Session {
            store,
            mode: Mode::Browse,
            search_term: String::new(),
            filtered: Vec::new(),
            current: None,
            draft: None,
            target: None,
            warnings,
            error: None,
            notice: None,
        };
        session.refresh_view(None);
        session
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn records(&self) -> &[Record] {
        &self.store.records
    }

    pub fn path(&self) -> &Path {
        &self.store.path
    }

    /// Store indices in the filtered view
    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    /// Index into the filtered view
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_record(&self) -> Option<&Record> {
        let store_index = *self.filtered.get(self.current?)?;
        self.store.records.get(store_index)
    }

    pub fn draft(&self) -> Option<&Record> {
        self.draft.as_ref()
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    pub fn can_go_up(&self) -> bool {
        self.current.is_some_and(|i| i > 0)
    }

    pub fn can_go_down(&self) -> bool {
        self.current.is_some_and(|i| i + 1 < self.filtered.len())
    }

    // -----------------------------------------------------------------------
    // Search and navigation
    // -----------------------------------------------------------------------

    /// Filter the view by `term`; the first match becomes current.
    pub fn search(&mut self, term: &str) {
        if term == self.search_term {
            return;
        }
        self.search_term = term.to_string();
        self.current = None;
        self.refresh_view(None);
        tracing::debug!(term, matches = self.filtered.len(), "search");
    }

    /// Move the selection. Only applies while browsing; never wraps.
    pub fn navigate(&mut self, direction: Direction) {
        if self.mode != Mode::Browse || self.filtered.is_empty() {
            return;
        }
        let last = self.filtered.len() - 1;
        let current = self.current.unwrap_or(0);
        self.current = Some(match direction {
            Direction::Up => current.saturating_sub(1),
            Direction::Down => (current + 1).min(last),
            Direction::Home => 0,
            Direction::End => last,
        });
    }

    // -----------------------------------------------------------------------
    // Mode transitions
    // -----------------------------------------------------------------------

    pub fn start_create(&mut self) {
        if self.mode != Mode::Browse {
            return;
        }
        self.draft = Some(Record::default());
        self.target = None;
        self.mode = Mode::Create;
    }

    /// Open the form on the current record. No-op without a selection.
    pub fn start_update(&mut self) {
        if self.mode != Mode::Browse {
            return;
        }
        let Some(index) = self.current_store_index() else {
            tracing::debug!("update requested with no selection");
            return;
        };
        self.draft = Some(self.store.records[index].clone());
        self.target = Some(index);
        self.mode = Mode::Update;
    }

    /// Ask to delete the current record. No-op without a selection.
    pub fn start_delete(&mut self) {
        if self.mode != Mode::Browse {
            return;
        }
        let Some(index) = self.current_store_index() else {
            tracing::debug!("delete requested with no selection");
            return;
        };
        self.target = Some(index);
        self.mode = Mode::Delete;
    }

    /// Ask to reload from disk.
    pub fn request_reload(&mut self) {
        if self.mode == Mode::Browse {
            self.mode = Mode::Confirm;
        }
    }

    /// Submit the form. On a validation or write failure the form stays
    /// open holding `fields`, and nothing is changed.
    pub fn submit(&mut self, fields: Record) {
        let (result, select) = match (self.mode, self.target) {
            (Mode::Create, _) => (
                record_ops::create(&self.store.records, fields.clone()),
                self.store.len(),
            ),
            (Mode::Update, Some(index)) => (
                record_ops::update(&self.store.records, index, fields.clone()),
                index,
            ),
            _ => return,
        };

        let next = match result {
            Ok(next) => next,
            Err(e) => {
                tracing::info!(key = %fields.key, error = %e, "submit rejected");
                self.draft = Some(fields);
                self.error = Some(e.into());
                return;
            }
        };

        if let Err(e) = self.store.commit(next) {
            self.draft = Some(fields);
            self.error = Some(e.into());
            return;
        }

        let verb = if self.mode == Mode::Create {
            "added"
        } else {
            "updated"
        };
        tracing::info!(key = %fields.key, "record {}", verb);
        self.notice = Some(format!("Record {}.", verb));
        self.close_form();
        self.refresh_view(Some(select));
    }

    /// Carry out the pending confirmation (delete or reload).
    pub fn confirm(&mut self) {
        match self.mode {
            Mode::Delete => self.confirm_delete(),
            Mode::Confirm => {
                self.close_form();
                self.reload();
            }
            _ => {}
        }
    }

    fn confirm_delete(&mut self) {
        let Some(index) = self.target else {
            self.close_form();
            return;
        };
        let next = match record_ops::delete(&self.store.records, index) {
            Ok(next) => next,
            Err(e) => {
                self.error = Some(e.into());
                self.close_form();
                return;
            }
        };
        let removed = self.store.records[index].clone();

        if let Err(e) = self.store.commit(next) {
            self.error = Some(e.into());
            return;
        }

        recovery::log_record_deletion(&self.store.path, &removed);
        tracing::info!(key = %removed.key, "record deleted");
        self.notice = Some("Record deleted.".to_string());
        self.close_form();
        self.refresh_view(None);
    }

    /// Leave any form or confirmation without changing data.
    pub fn cancel(&mut self) {
        if self.mode != Mode::Browse {
            self.close_form();
        }
    }

    fn close_form(&mut self) {
        self.mode = Mode::Browse;
        self.draft = None;
        self.target = None;
    }

    // -----------------------------------------------------------------------
    // File operations
    // -----------------------------------------------------------------------

    /// Re-read the bound file, keeping only the search term.
    /// If the file cannot be read, the current state is kept.
    pub fn reload(&mut self) {
        let path = self.store.path.clone();
        if self.replace_store(&path) {
            self.notice = Some("Data reloaded.".to_string());
        }
    }

    /// Switch to another data file, keeping the search term.
    pub fn open_file(&mut self, path: &Path) {
        if self.replace_store(path) {
            self.notice = Some(format!("Opened {}.", self.store.file_name()));
        }
    }

    fn replace_store(&mut self, path: &Path) -> bool {
        match RecordStore::open(path) {
            Ok((store, warnings)) => {
                tracing::info!(path = %path.display(), count = store.len(), "loaded");
                self.store = store;
                self.warnings.extend(warnings);
                self.close_form();
                self.current = None;
                self.refresh_view(None);
                true
            }
            Err(e) => {
                self.error = Some(e.into());
                false
            }
        }
    }

    /// Rewrite the file from memory in canonical form.
    pub fn save(&mut self) {
        match self.store.save() {
            Ok(()) => self.notice = Some("Saved!".to_string()),
            Err(e) => self.error = Some(e.into()),
        }
    }

    /// Clipboard text for the current record, while browsing.
    pub fn copy_text(&self) -> Option<String> {
        if self.mode != Mode::Browse {
            return None;
        }
        self.current_record().map(clipboard_text)
    }

    // -----------------------------------------------------------------------
    // View
    // -----------------------------------------------------------------------

    /// Build the view model, handing over pending messages.
    pub fn view_model(&mut self) -> ViewModel {
        let records: Vec<Record> = self
            .filtered
            .iter()
            .map(|&i| self.store.records[i].clone())
            .collect();
        ViewModel {
            status: Status {
                mode: self.mode,
                filename: self.store.file_name(),
                total: self.store.len(),
                matches: self.filtered.len(),
                position: self.current.map_or(0, |i| i + 1),
            },
            search_term: self.search_term.clone(),
            records,
            current: self.current,
            can_go_up: self.can_go_up(),
            can_go_down: self.can_go_down(),
            draft: self.draft.clone(),
            target: self.target.and_then(|i| self.store.records.get(i).cloned()),
            warnings: std::mem::take(&mut self.warnings),
            error: self.error.take().map(|e| e.to_string()),
            notice: self.notice.take(),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn current_store_index(&self) -> Option<usize> {
        self.filtered.get(self.current?).copied()
    }

    /// Recompute the filtered view and re-clamp the selection.
    /// `select` (a store index) becomes current when it is in the view.
    fn refresh_view(&mut self, select: Option<usize>) {
        self.filtered = search::filter_indices(&self.store.records, &self.search_term);
        let wanted = select.and_then(|idx| self.filtered.iter().position(|&i| i == idx));
        self.current = match wanted {
            Some(pos) => Some(pos),
            None if self.filtered.is_empty() => None,
            None => Some(self.current.unwrap_or(0).min(self.filtered.len() - 1)),
        };
    }
}
