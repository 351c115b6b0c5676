use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::{first_line, spans_width};
use super::push_highlighted_spans;

/// Keep `current` inside a window of `height` rows starting at `scroll`.
pub fn adjust_scroll(scroll: usize, current: Option<usize>, height: usize, len: usize) -> usize {
    if height == 0 || len <= height {
        return 0;
    }
    let max_scroll = len - height;
    let scroll = match current {
        Some(c) if c < scroll => c,
        Some(c) if c >= scroll + height => c + 1 - height,
        _ => scroll,
    };
    scroll.min(max_scroll)
}

/// Render the filtered record list (left pane)
pub fn render_record_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let search_re = app.search_re();

    let title = if app.view.search_term.is_empty() {
        " Records ".to_string()
    } else {
        format!(" Records /{} ", app.view.search_term)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.view.records.is_empty() {
        let text = if app.view.search_term.is_empty() {
            "No records yet. Press c to create one."
        } else {
            "No records found."
        };
        let empty = Paragraph::new(Line::from(Span::styled(
            format!(" {}", text),
            Style::default().fg(app.theme.dim).bg(bg),
        )));
        frame.render_widget(empty, inner);
        return;
    }

    let height = inner.height as usize;
    let width = inner.width as usize;
    app.list_scroll = adjust_scroll(
        app.list_scroll,
        app.view.current,
        height,
        app.view.records.len(),
    );

    let mut lines: Vec<Line> = Vec::new();
    for (i, record) in app
        .view
        .records
        .iter()
        .enumerate()
        .skip(app.list_scroll)
        .take(height)
    {
        let selected = app.view.current == Some(i);
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let key_style = if selected {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text_bright).bg(row_bg)
        };
        let text_style = Style::default().fg(app.theme.text).bg(row_bg);
        let match_style = Style::default()
            .fg(app.theme.search_match_fg)
            .bg(app.theme.search_match_bg);

        let marker = if selected { "\u{258C}" } else { " " };
        let mut spans = vec![Span::styled(
            marker,
            Style::default().fg(app.theme.selection_border).bg(row_bg),
        )];

        let key = unicode::truncate_to_width(&record.key, width.saturating_sub(1));
        push_highlighted_spans(&mut spans, &key, key_style, match_style, search_re.as_ref());

        let used = spans_width(&spans);
        if used + 3 < width {
            spans.push(Span::styled("  ", text_style));
            let value = unicode::truncate_to_width(first_line(&record.value), width - used - 2);
            push_highlighted_spans(&mut spans, &value, text_style, match_style, search_re.as_ref());
        }

        let used = spans_width(&spans);
        if selected && used < width {
            spans.push(Span::styled(" ".repeat(width - used), text_style));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Direction;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn scroll_follows_current() {
        assert_eq!(adjust_scroll(0, Some(0), 5, 3), 0);
        assert_eq!(adjust_scroll(0, Some(7), 5, 20), 3);
        assert_eq!(adjust_scroll(3, Some(4), 5, 20), 3);
        assert_eq!(adjust_scroll(6, Some(2), 5, 20), 2);
        assert_eq!(adjust_scroll(18, None, 5, 10), 5);
    }

    #[test]
    fn list_shows_keys_and_first_value_line() {
        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        let output = render_to_string(40, 8, |frame, area| {
            render_record_list(frame, &mut app, area);
        });
        assert!(output.contains("Records"));
        assert!(output.contains("\u{258C}1775-04-19  Lexington"));
        assert!(output.contains(" 1776-07-04  Independence"));
    }

    #[test]
    fn filtered_list_title_shows_term() {
        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        app.session.search("founding");
        app.refresh();
        let output = render_to_string(40, 8, |frame, area| {
            render_record_list(frame, &mut app, area);
        });
        assert!(output.contains("Records /founding"));
        assert!(!output.contains("1775-04-19"));
    }

    #[test]
    fn no_matches_message() {
        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        app.session.search("treaty");
        app.refresh();
        let output = render_to_string(40, 6, |frame, area| {
            render_record_list(frame, &mut app, area);
        });
        assert!(output.contains("No records found."));
    }

    #[test]
    fn list_scrolls_to_selection() {
        let mut csv = String::from(EMPTY_CSV);
        for year in 1800..1830 {
            csv.push_str(&format!("\"{}\",\"event\",\"\"\n", year));
        }
        let (_tmp, mut app) = app_with_records(&csv);
        app.session.navigate(Direction::End);
        app.refresh();
        let output = render_to_string(40, 10, |frame, area| {
            render_record_list(frame, &mut app, area);
        });
        assert!(output.contains("1829"));
        assert!(!output.contains("1800"));
        assert_eq!(app.list_scroll, 22);
    }
}
