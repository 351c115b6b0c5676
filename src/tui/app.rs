use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::cli::handlers::load_context;
use crate::io::config_io;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::model::record::Record;
use crate::ops::search;
use crate::session::{Mode, Session, ViewModel};

use super::input;
use super::render;
use super::theme::Theme;

/// Form field with focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Key,
    Value,
    Tags,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Key, FormField::Value, FormField::Tags];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Key => "Key",
            FormField::Value => "Value",
            FormField::Tags => "Tags",
        }
    }

    fn index(self) -> usize {
        match self {
            FormField::Key => 0,
            FormField::Value => 1,
            FormField::Tags => 2,
        }
    }

    pub fn next(self) -> FormField {
        FormField::ALL[(self.index() + 1) % 3]
    }

    pub fn prev(self) -> FormField {
        FormField::ALL[(self.index() + 2) % 3]
    }
}

/// Editing state of the create/update form
#[derive(Debug, Clone)]
pub struct FormState {
    /// Key, value and tags buffers
    pub fields: [String; 3],
    pub focus: FormField,
    /// Byte offset of the cursor in the focused field
    pub cursor: usize,
}

impl FormState {
    pub fn from_record(record: &Record) -> Self {
        FormState {
            fields: [record.key.clone(), record.value.clone(), record.tags.clone()],
            focus: FormField::Key,
            cursor: record.key.len(),
        }
    }

    pub fn to_record(&self) -> Record {
        let [key, value, tags] = &self.fields;
        Record::new(key.clone(), value.clone(), tags.clone())
    }

    pub fn buffer(&self) -> &str {
        &self.fields[self.focus.index()]
    }

    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.fields[self.focus.index()]
    }

    pub fn field(&self, field: FormField) -> &str {
        &self.fields[field.index()]
    }

    /// Move focus, placing the cursor at the end of the new field.
    pub fn focus(&mut self, field: FormField) {
        self.focus = field;
        self.cursor = self.buffer().len();
    }
}

/// Which line prompt is open in the status area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Search,
    OpenFile,
}

#[derive(Debug, Clone)]
pub struct PromptState {
    pub kind: PromptKind,
    pub input: String,
    /// Search term in effect when the prompt opened (restored on Esc)
    pub previous: String,
    /// Position in search history while browsing it with Up/Down
    pub history_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

/// One-line feedback shown under the status row until the next key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

/// Main application state
pub struct App {
    pub session: Session,
    /// View model from the last session action
    pub view: ViewModel,
    pub theme: Theme,
    pub show_key_hints: bool,
    pub ui_state: UiState,
    pub form: Option<FormState>,
    pub prompt: Option<PromptState>,
    pub message: Option<Message>,
    pub show_help: bool,
    pub should_quit: bool,
    /// First visible row of the record list
    pub list_scroll: usize,
}

impl App {
    pub fn new(session: Session, theme: Theme) -> Self {
        let mut session = session;
        let view = session.view_model();
        let mut app = App {
            session,
            view: view.clone(),
            theme,
            show_key_hints: true,
            ui_state: UiState::default(),
            form: None,
            prompt: None,
            message: None,
            show_help: false,
            should_quit: false,
            list_scroll: 0,
        };
        app.absorb(view);
        app
    }

    /// Pull a fresh view model from the session after an action.
    pub fn refresh(&mut self) {
        let view = self.session.view_model();
        self.absorb(view);
    }

    fn absorb(&mut self, view: ViewModel) {
        if let Some(first) = view.warnings.first() {
            let text = if view.warnings.len() == 1 {
                first.to_string()
            } else {
                format!(
                    "{} malformed rows skipped (see `tl recovery`)",
                    view.warnings.len()
                )
            };
            self.message = Some(Message {
                kind: MessageKind::Warning,
                text,
            });
        }
        if let Some(text) = &view.notice {
            self.info(text.clone());
        }
        if let Some(text) = &view.error {
            self.error(text.clone());
        }

        match view.status.mode {
            Mode::Create | Mode::Update => {
                if self.form.is_none() {
                    let draft = view.draft.clone().unwrap_or_default();
                    self.form = Some(FormState::from_record(&draft));
                }
            }
            _ => self.form = None,
        }

        self.view = view;
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            kind: MessageKind::Info,
            text: text.into(),
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            kind: MessageKind::Error,
            text: text.into(),
        });
    }

    /// Regex for highlighting the active search term
    pub fn search_re(&self) -> Option<Regex> {
        let term = match &self.prompt {
            Some(p) if p.kind == PromptKind::Search => &p.input,
            _ => &self.view.search_term,
        };
        search::highlight_regex(term)
    }

    /// Copy the current record to the system clipboard.
    pub fn copy_current(&mut self) {
        let Some(text) = self.session.copy_text() else {
            return;
        };
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text)) {
            Ok(()) => self.info("Copied to clipboard."),
            Err(e) => {
                tracing::warn!(error = %e, "clipboard unavailable");
                self.error(format!("clipboard unavailable: {}", e));
            }
        }
    }

    /// Switch to another data file, carrying UI state across.
    pub fn open_file(&mut self, path: &Path) {
        save_ui_state(self);
        self.session.open_file(path);
        if self.session.path() == path {
            restore_ui_state(self);
        }
        self.refresh();
    }
}

/// Restore search history and last search from the state file (defaults
/// when there is none)
pub fn restore_ui_state(app: &mut App) {
    let state = read_ui_state(app.session.path()).unwrap_or_default();
    if let Some(term) = &state.last_search {
        app.session.search(term);
    }
    app.ui_state = state;
}

/// Save search history and last search beside the data file
pub fn save_ui_state(app: &mut App) {
    let term = app.session.search_term();
    app.ui_state.last_search = (!term.is_empty()).then(|| term.to_string());
    if let Err(e) = write_ui_state(app.session.path(), &app.ui_state) {
        tracing::warn!(error = %e, "could not save UI state");
    }
}

/// Run the TUI application
pub fn run(file: Option<&Path>, config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let (config, path): (_, PathBuf) = load_context(file, config)?;
    crate::logging::init_tui(config_io::log_dir(&config).as_deref());
    tracing::info!(path = %path.display(), "starting TUI");

    let session = Session::open(&path)?;
    let mut app = App::new(session, Theme::from_config(&config.ui));
    app.show_key_hints = config.ui.show_key_hints;
    restore_ui_state(&mut app);
    app.refresh();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
