use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, PromptKind, PromptState};

pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) {
    let Some(mut prompt) = app.prompt.take() else {
        return;
    };

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            if prompt.kind == PromptKind::Search {
                app.session.search(&prompt.previous);
                app.refresh();
            }
            return;
        }

        (_, KeyCode::Enter) => {
            match prompt.kind {
                PromptKind::Search => app.ui_state.remember_search(&prompt.input),
                PromptKind::OpenFile => {
                    let path = PathBuf::from(prompt.input.trim());
                    if !prompt.input.trim().is_empty() {
                        app.open_file(&path);
                    }
                }
            }
            return;
        }

        // History navigation: Up = older
        (_, KeyCode::Up) if prompt.kind == PromptKind::Search => {
            let next = prompt.history_index.map_or(0, |i| i + 1);
            if let Some(term) = app.ui_state.search_history.get(next) {
                prompt.input = term.clone();
                prompt.history_index = Some(next);
            }
        }
        (_, KeyCode::Down) if prompt.kind == PromptKind::Search => {
            match prompt.history_index {
                Some(0) | None => {
                    prompt.history_index = None;
                    prompt.input.clear();
                }
                Some(i) => {
                    prompt.history_index = Some(i - 1);
                    if let Some(term) = app.ui_state.search_history.get(i - 1) {
                        prompt.input = term.clone();
                    }
                }
            }
        }

        (_, KeyCode::Backspace) => {
            prompt.input.pop();
        }
        (KeyModifiers::NONE, KeyCode::Char(c)) => prompt.input.push(c),
        _ => {}
    }

    // Searching is incremental
    if prompt.kind == PromptKind::Search {
        app.session.search(&prompt.input);
        app.refresh();
    }
    app.prompt = Some(prompt);
}

/// Open a prompt prefilled with `input`
pub(super) fn open_prompt(app: &mut App, kind: PromptKind, input: String) {
    let previous = match kind {
        PromptKind::Search => input.clone(),
        PromptKind::OpenFile => String::new(),
    };
    app.prompt = Some(PromptState {
        kind,
        input,
        previous,
        history_index: None,
    });
}
