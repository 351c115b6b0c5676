use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::session::Mode;
use crate::tui::app::{App, FormField, FormState};

const CURSOR: &str = "\u{258C}";

/// Split `text` into display lines, inserting the cursor glyph at `cursor`
/// when given.
fn field_lines(text: &str, cursor: Option<usize>) -> Vec<(String, Option<usize>)> {
    let mut lines = Vec::new();
    let mut start = 0;
    for part in text.split('\n') {
        let end = start + part.len();
        let cursor_col = cursor.filter(|&c| c >= start && c <= end).map(|c| c - start);
        lines.push((part.to_string(), cursor_col));
        start = end + 1;
    }
    lines
}

fn render_field<'a>(
    lines: &mut Vec<Line<'a>>,
    form: &FormState,
    field: FormField,
    label_style: Style,
    focus_style: Style,
    text_style: Style,
    cursor_style: Style,
) {
    let focused = form.focus == field;
    let marker = if focused { "> " } else { "  " };
    let style = if focused { focus_style } else { label_style };
    lines.push(Line::from(Span::styled(
        format!("{}{}", marker, field.label()),
        style,
    )));

    let cursor = focused.then_some(form.cursor);
    for (text, cursor_col) in field_lines(form.field(field), cursor) {
        let mut spans = vec![Span::styled("    ", text_style)];
        match cursor_col {
            Some(col) => {
                spans.push(Span::styled(text[..col].to_string(), text_style));
                spans.push(Span::styled(CURSOR, cursor_style));
                spans.push(Span::styled(text[col..].to_string(), text_style));
            }
            None => spans.push(Span::styled(text, text_style)),
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
}

/// Render the create/update form (right pane)
pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let title = match app.view.status.mode {
        Mode::Update => " Edit record ",
        _ => " New record ",
    };
    let title_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, title_style))
        .border_style(Style::default().fg(app.theme.selection_border).bg(bg))
        .style(Style::default().bg(bg));

    let Some(form) = &app.form else {
        frame.render_widget(block, area);
        return;
    };

    let label_style = Style::default().fg(app.theme.dim).bg(bg);
    let focus_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let cursor_style = Style::default().fg(app.theme.highlight).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    for field in FormField::ALL {
        render_field(
            &mut lines,
            form,
            field,
            label_style,
            focus_style,
            text_style,
            cursor_style,
        );
    }

    if app.show_key_hints {
        lines.push(Line::from(Span::styled(
            "Enter save  Tab next  Alt-Enter newline  Esc cancel",
            label_style,
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
