use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Cells a tab occupies when rendered
const TAB_WIDTH: usize = 4;

/// Display width in terminal cells. Tabs count as four cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" {
        TAB_WIDTH
    } else {
        UnicodeWidthStr::width(g)
    }
}

/// Truncate to at most `max_cells` terminal cells, ending with `…` when cut.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }

    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let gw = grapheme_width(g);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Byte offset of the grapheme after the one at `byte_offset`; None at the end.
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    let g = s.get(byte_offset..)?.graphemes(true).next()?;
    Some(byte_offset + g.len())
}

/// Byte offset of the grapheme before `byte_offset`; None at the start.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    let g = s.get(..byte_offset)?.graphemes(true).next_back()?;
    Some(byte_offset - g.len())
}
