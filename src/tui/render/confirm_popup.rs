use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::session::Mode;
use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::centered_rect_fixed;

/// Render the y/n popup for a pending delete or reload
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let popup_w: u16 = 48.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(4) as usize;

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let (title, question) = match app.view.status.mode {
        Mode::Delete => {
            let key = app
                .view
                .target
                .as_ref()
                .map(|r| r.key.as_str())
                .unwrap_or("");
            (" Delete ", format!("Delete {}?", key))
        }
        _ => (
            " Reload ",
            format!("Reload {} from disk?", app.view.status.filename),
        ),
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", unicode::truncate_to_width(&question, inner_w)),
            text_style,
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" y", key_style),
            Span::styled(" confirm   ", text_style),
            Span::styled("n/Esc", key_style),
            Span::styled(" cancel", text_style),
        ]),
    ];

    let popup_h = (lines.len() as u16) + 2;
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, header_style))
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}
