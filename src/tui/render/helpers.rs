use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use regex::Regex;

use crate::model::record::Record;
use crate::tui::theme::Theme;
use crate::util::unicode;

use super::push_highlighted_spans;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Tag labels, each in its own color, separated by spaces
pub(super) fn tag_spans<'a>(
    record: &Record,
    theme: &Theme,
    bg: ratatui::style::Color,
    search_re: Option<&Regex>,
) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let match_style = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);
    for (i, tag) in record.tag_labels().into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ", Style::default().bg(bg)));
        }
        let style = Style::default().fg(theme.tag_color(tag)).bg(bg);
        push_highlighted_spans(&mut spans, tag, style, match_style, search_re);
    }
    spans
}

/// First line of a value, for one-line displays
pub(super) fn first_line(value: &str) -> &str {
    value.lines().next().unwrap_or("")
}

pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
