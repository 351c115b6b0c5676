use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::session::Session;
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Build an App over a scratch data file holding `csv`.
/// Keep the TempDir alive for as long as the App is used.
pub fn app_with_records(csv: &str) -> (TempDir, App) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("timeline.csv");
    std::fs::write(&path, csv).unwrap();
    let session = Session::open(&path).unwrap();
    (tmp, App::new(session, Theme::default()))
}

/// Render the whole screen of `app`.
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| super::render(frame, app))
}

pub const SAMPLE_CSV: &str = "\
# key,value,tags
\"1775-04-19\",\"Lexington and Concord\",\"#War\"
\"1776-07-04\",\"Independence\",\"#Founding\"
\"1787-09-17\",\"Constitution signed\",\"#Founding,#Law\"
";

pub const EMPTY_CSV: &str = "# key,value,tags\n";
