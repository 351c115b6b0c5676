use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::tui::app::App;

use super::helpers::tag_spans;
use super::push_highlighted_spans;

/// Render the current record (right pane, Browse mode)
pub fn render_detail_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let label_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let match_style = Style::default()
        .fg(app.theme.search_match_fg)
        .bg(app.theme.search_match_bg);
    let search_re = app.search_re();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Record ", label_style))
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let Some(record) = app.view.current_record() else {
        let empty = Paragraph::new(Line::from(Span::styled(
            " No record selected.",
            Style::default().fg(app.theme.dim).bg(bg),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();

    let mut key_line = vec![Span::styled("Key: ", label_style)];
    push_highlighted_spans(&mut key_line, &record.key, text_style, match_style, search_re.as_ref());
    lines.push(Line::from(key_line));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Value:", label_style)));
    if record.value.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (empty)",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }
    for value_line in record.value.lines() {
        let mut spans = vec![Span::styled("  ", text_style)];
        push_highlighted_spans(&mut spans, value_line, text_style, match_style, search_re.as_ref());
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));

    let mut tags_line = vec![Span::styled("Tags: ", label_style)];
    tags_line.extend(tag_spans(record, &app.theme, bg, search_re.as_ref()));
    lines.push(Line::from(tags_line));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
