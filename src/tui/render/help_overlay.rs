use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

const BROWSE_BINDINGS: &[(&str, &str)] = &[
    (" \u{2191}\u{2193}/jk", "Move up/down"),
    (" g/G", "Jump to first/last"),
    (" /", "Search"),
    (" Esc", "Clear search"),
    (" c", "Create record"),
    (" u/e", "Update record"),
    (" d", "Delete record"),
    (" y", "Copy record to clipboard"),
    (" r", "Reload from disk"),
    (" Ctrl-S", "Save (rewrite file)"),
    (" o", "Open another file"),
    (" q", "Quit"),
];

const FORM_BINDINGS: &[(&str, &str)] = &[
    (" Tab/S-Tab", "Next/previous field"),
    (" Enter", "Save record"),
    (" Alt-Enter", "Newline in value"),
    (" Esc", "Cancel"),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Browse", header_style)));
    for (key, desc) in BROWSE_BINDINGS {
        add_binding(&mut lines, key, desc, key_style, desc_style);
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Create / Update", header_style)));
    for (key, desc) in FORM_BINDINGS {
        add_binding(&mut lines, key, desc, key_style, desc_style);
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Press any key to close",
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    let block = Block::default()
        .title(Span::styled(" Key Bindings ", header_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    lines.push(Line::from(vec![
        Span::styled(format!("{:<12}", key), key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Rect centered in `area` taking the given percentages of it
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
