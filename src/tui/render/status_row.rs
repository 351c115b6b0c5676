use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::session::Mode;
use crate::tui::app::{App, MessageKind, PromptKind};
use crate::util::unicode;

use super::helpers::spans_width;

/// Pad `spans` and right-align `hint` when there is room for it
fn push_right_hint<'a>(spans: &mut Vec<Span<'a>>, hint: &'a str, width: usize, style: Style) {
    let content_width = spans_width(spans);
    let hint_width = unicode::display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), style));
        spans.push(Span::styled(hint, style));
    }
}

/// Render the status row: counts, or the open prompt
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let line = match &app.prompt {
        Some(prompt) => {
            let label = match prompt.kind {
                PromptKind::Search => "/",
                PromptKind::OpenFile => "Open: ",
            };
            let mut spans = vec![
                Span::styled(
                    format!("{}{}", label, prompt.input),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ];
            let hint = match prompt.kind {
                PromptKind::Search => "Enter keep  Esc cancel",
                PromptKind::OpenFile => "Enter open  Esc cancel",
            };
            push_right_hint(&mut spans, hint, width, dim);
            Line::from(spans)
        }
        None => Line::from(Span::styled(
            unicode::truncate_to_width(&app.view.status.to_string(), width),
            Style::default().fg(app.theme.text).bg(bg),
        )),
    };

    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

/// Render the message row: last notice/warning/error, else key hints
pub fn render_message_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = if let Some(message) = &app.message {
        let color = match message.kind {
            MessageKind::Info => app.theme.green,
            MessageKind::Warning => app.theme.yellow,
            MessageKind::Error => app.theme.red,
        };
        Line::from(Span::styled(
            unicode::truncate_to_width(&message.text, width),
            Style::default().fg(color).bg(bg),
        ))
    } else if app.show_key_hints {
        let hint = match app.view.status.mode {
            Mode::Browse => "c new  u edit  d delete  y copy  / search  r reload  ? help  q quit",
            Mode::Create | Mode::Update => "Enter save  Tab next field  Esc cancel",
            Mode::Delete | Mode::Confirm => "y confirm  n cancel",
        };
        Line::from(Span::styled(
            unicode::truncate_to_width(hint, width),
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    } else {
        Line::from("")
    };

    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::PromptState;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn status_shows_counts() {
        let (_tmp, app) = app_with_records(SAMPLE_CSV);
        let output = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_eq!(
            output,
            "Mode: browse | File: timeline.csv | Lines: 3 | Matches: 3 | Current: 1"
        );
    }

    #[test]
    fn search_prompt_replaces_status() {
        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        app.prompt = Some(PromptState {
            kind: PromptKind::Search,
            input: "found".into(),
            previous: String::new(),
            history_index: None,
        });
        let output = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert!(output.starts_with("/found\u{258C}"));
        assert!(output.ends_with("Enter keep  Esc cancel"));
    }

    #[test]
    fn message_beats_hints() {
        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        let hints = render_to_string(TERM_W, 1, |frame, area| {
            render_message_row(frame, &app, area);
        });
        assert!(hints.starts_with("c new"));

        app.info("Saved!");
        let output = render_to_string(TERM_W, 1, |frame, area| {
            render_message_row(frame, &app, area);
        });
        assert_eq!(output, "Saved!");
    }
}
