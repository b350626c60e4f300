pub mod add_form;
pub mod card_list;
pub mod help;
pub mod status_bar;
pub mod theme;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::app::{AppState, Mode, TextBuffer};
use crate::input::mouse::HitMap;

/// Create a centered rect within `area` using percentage-based sizing with minimums.
pub fn centered_rect(area: Rect, w_pct: u16, h_pct: u16, min_w: u16, min_h: u16) -> Rect {
    let width = (area.width * w_pct / 100).max(min_w).min(area.width);
    let height = (area.height * h_pct / 100).max(min_h).min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Draw the whole screen from `state` and return the clickable regions.
pub fn render(f: &mut Frame, state: &AppState) -> HitMap {
    let mut hits = HitMap::default();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    add_form::render_add_form(f, chunks[0], state, &mut hits);
    card_list::render_card_list(f, chunks[1], state, &mut hits);
    status_bar::render_status_bar(f, chunks[2], state);

    if state.mode == Mode::Help {
        help::render_help(f, f.area());
    }
    hits
}

/// The slice of `buf` that fits in `width` columns with the cursor visible,
/// and the cursor's column within that slice.
pub(crate) fn scroll_to_cursor(buf: &TextBuffer, width: u16) -> (String, u16) {
    let width = width as usize;
    if width == 0 {
        return (String::new(), 0);
    }
    let chars: Vec<char> = buf.input.chars().collect();
    let cursor = buf.cursor.min(chars.len());
    let span = |from: usize| -> usize {
        chars[from..cursor]
            .iter()
            .map(|c| c.width().unwrap_or(0))
            .sum()
    };
    // Keep one column free for the caret itself.
    let mut start = 0;
    while start < cursor && span(start) >= width {
        start += 1;
    }
    let mut shown = String::new();
    let mut used = 0;
    for c in &chars[start..] {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        shown.push(*c);
    }
    (shown, span(start) as u16)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    /// Draw `state` on a `width`x`height` test terminal; returns the screen rows
    /// and the hit map.
    pub(crate) fn draw(state: &AppState, width: u16, height: u16) -> (Vec<String>, HitMap) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut hits = HitMap::default();
        terminal.draw(|f| hits = render(f, state)).unwrap();
        let buffer = terminal.backend().buffer();
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect();
        (rows, hits)
    }

    pub(crate) fn screen_contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|r| r.contains(needle))
    }

    #[test]
    fn test_centered_rect_respects_minimums() {
        let area = Rect::new(0, 0, 100, 40);
        let r = centered_rect(area, 50, 50, 60, 10);
        assert_eq!(r.width, 60);
        assert_eq!(r.height, 20);
        assert_eq!(r.x, 20);
    }

    #[test]
    fn test_scroll_to_cursor_short_text() {
        let buf = TextBuffer::new("hello".into());
        assert_eq!(scroll_to_cursor(&buf, 10), ("hello".into(), 5));
    }

    #[test]
    fn test_scroll_to_cursor_keeps_caret_visible() {
        let buf = TextBuffer::new("abcdefghij".into());
        let (shown, col) = scroll_to_cursor(&buf, 5);
        assert_eq!(shown, "ghij");
        assert_eq!(col, 4);
    }

    #[test]
    fn test_scroll_to_cursor_at_start() {
        let mut buf = TextBuffer::new("abcdefghij".into());
        buf.home();
        assert_eq!(scroll_to_cursor(&buf, 4), ("abcd".into(), 0));
    }

    #[test]
    fn test_scroll_to_cursor_wide_chars() {
        let buf = TextBuffer::new("日本語".into());
        let (shown, col) = scroll_to_cursor(&buf, 4);
        assert_eq!(shown, "語");
        assert_eq!(col, 2);
    }
}
