use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Padding, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState,
};
use ratatui::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use crate::app::AppState;
use crate::edit::EditSession;
use crate::input::mouse::{HitMap, Target};
use crate::view::{card_views, CardView, Control, ViewNode};

/// 2 border lines + text line + hint line.
const CARD_HEIGHT: u16 = 4;

/// Truncate `text` to `max_width` columns on grapheme boundaries, marking
/// the cut with `…`.
pub(crate) fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let avail = max_width.saturating_sub(1);
    let kept: String = text
        .graphemes(true)
        .scan(0, |w, g| {
            let gw = g.width();
            (*w + gw <= avail).then(|| {
                *w += gw;
                g
            })
        })
        .collect();
    if max_width == 0 {
        kept
    } else {
        format!("{kept}…")
    }
}

/// Display width of the control strip, e.g. `[edit] [del]`.
fn controls_width(controls: &[Control]) -> u16 {
    let labels: usize = controls.iter().map(|c| c.label().width() + 2).sum();
    (labels + controls.len().saturating_sub(1)) as u16
}

/// First card index to draw so that `selected` stays on screen.
fn scroll_offset(selected: usize, count: usize, max_visible: usize) -> usize {
    if max_visible == 0 || count <= max_visible || selected < max_visible {
        0
    } else {
        selected - max_visible + 1
    }
}

pub fn render_card_list(f: &mut Frame, area: Rect, state: &AppState, hits: &mut HitMap) {
    let count = state.card_count();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Theme::BORDER))
        .title(Line::from(vec![
            Span::styled(
                " Cards ",
                Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("({count}) "), Theme::dim_style()),
        ]))
        .padding(Padding::new(1, 1, 0, 0));

    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if let Some(ViewNode::Empty { message }) = state.view.first() {
        let y = inner.y + inner.height.saturating_sub(1) / 2;
        f.render_widget(
            Paragraph::new(Span::styled(*message, Theme::dim_style())).centered(),
            Rect::new(inner.x, y, inner.width, 1),
        );
        return;
    }

    let max_visible = (inner.height / CARD_HEIGHT) as usize;
    let offset = scroll_offset(state.selected, count, max_visible);

    for (idx, card) in card_views(&state.view)
        .enumerate()
        .skip(offset)
        .take(max_visible)
    {
        let y = inner.y + (idx - offset) as u16 * CARD_HEIGHT;
        let card_area = Rect::new(inner.x, y, inner.width, CARD_HEIGHT);
        render_card(f, card_area, card, idx == state.selected, &state.session, hits);
    }

    if count > max_visible {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        let mut scrollbar_state = ScrollbarState::new(count).position(offset);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    card: &CardView,
    is_selected: bool,
    session: &EditSession,
    hits: &mut HitMap,
) {
    let editor = match session {
        EditSession::Editing { card_id, buf, .. } if *card_id == card.id => Some(buf),
        _ => None,
    };

    let selected_mod = if is_selected {
        Modifier::BOLD
    } else {
        Modifier::empty()
    };
    let border_color = if editor.is_some() {
        Theme::EDITOR
    } else {
        Theme::CARD_BORDER
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).add_modifier(selected_mod))
        .border_type(if is_selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        });
    let inner = block.inner(area);
    f.render_widget(block, area);

    hits.push(area, Target::Text(card.id.clone()));

    if inner.height == 0 || inner.width < 2 {
        return;
    }

    // Line 1: text or editor, controls on the right.
    let strip = controls_width(&card.controls).min(inner.width);
    let text_width = inner.width.saturating_sub(strip + 1);
    let text_area = Rect::new(inner.x, inner.y, text_width, 1);

    match editor {
        Some(buf) => {
            let (shown, caret) = super::scroll_to_cursor(buf, text_width);
            f.render_widget(
                Paragraph::new(Span::styled(
                    shown,
                    Style::default()
                        .fg(Theme::EDITOR)
                        .add_modifier(Modifier::UNDERLINED),
                )),
                text_area,
            );
            if text_width > 0 {
                f.set_cursor_position(Position::new(text_area.x + caret, text_area.y));
            }
        }
        None => {
            f.render_widget(
                Paragraph::new(Span::styled(
                    truncate(&card.text, text_width as usize),
                    Style::default()
                        .fg(Theme::CARD_TEXT)
                        .add_modifier(selected_mod),
                )),
                text_area,
            );
        }
    }

    let mut x = inner.x + inner.width - strip;
    for control in card.controls {
        let label = format!("[{}]", control.label());
        let width = (label.width() as u16).min(inner.x + inner.width - x);
        let style = match control {
            Control::Edit => Style::default().fg(Theme::CONTROL),
            Control::Delete => Style::default().fg(Theme::DANGER),
        };
        let control_area = Rect::new(x, inner.y, width, 1);
        f.render_widget(Paragraph::new(Span::styled(label, style)), control_area);
        hits.push(control_area, Target::Control(card.id.clone(), control));
        x = (x + width + 1).min(inner.x + inner.width);
    }

    // Line 2: usage hint.
    if inner.height >= 2 {
        f.render_widget(
            Paragraph::new(Span::styled(
                truncate(card.hint, inner.width as usize),
                Theme::dim_style(),
            )),
            Rect::new(inner.x, inner.y + 1, inner.width, 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Mode;
    use crate::cards::tests::spy_store;
    use crate::ui::tests::{draw, screen_contains};
    use crate::view::{CARD_HINT, EMPTY_MESSAGE};

    // ── truncate ──

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate("milk", 10), "milk");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("buy oat milk", 8), "buy oat…");
    }

    #[test]
    fn truncate_respects_wide_graphemes() {
        assert_eq!(truncate("日本語テキスト", 7), "日本語…");
    }

    #[test]
    fn truncate_zero_width() {
        assert_eq!(truncate("abc", 0), "");
    }

    // ── layout helpers ──

    #[test]
    fn controls_width_counts_brackets_and_gap() {
        // "[edit]" + " " + "[del]"
        assert_eq!(controls_width(&Control::ALL), 12);
    }

    #[test]
    fn scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 10, 3), 0);
        assert_eq!(scroll_offset(2, 10, 3), 0);
        assert_eq!(scroll_offset(5, 10, 3), 3);
        assert_eq!(scroll_offset(5, 2, 3), 0);
        assert_eq!(scroll_offset(5, 10, 0), 0);
    }

    // ── drawing ──

    #[test]
    fn empty_list_shows_message_without_card_targets() {
        let (_spy, store) = spy_store(&[]);
        let state = AppState::new(&store);
        let (rows, hits) = draw(&state, 70, 14);
        assert!(screen_contains(&rows, EMPTY_MESSAGE));
        // Only the add field and clear-all button are clickable.
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn cards_render_in_order_with_controls_and_hint() {
        let (_spy, store) = spy_store(&["Newest", "Oldest"]);
        let state = AppState::new(&store);
        let (rows, _) = draw(&state, 70, 14);
        let newest = rows.iter().position(|r| r.contains("Newest")).unwrap();
        let oldest = rows.iter().position(|r| r.contains("Oldest")).unwrap();
        assert!(newest < oldest);
        assert!(rows[newest].contains("[edit] [del]"));
        assert!(screen_contains(&rows, CARD_HINT));
        assert!(!screen_contains(&rows, EMPTY_MESSAGE));
    }

    #[test]
    fn controls_are_structural_targets() {
        let (_spy, store) = spy_store(&["A"]);
        let state = AppState::new(&store);
        let (_, hits) = draw(&state, 70, 14);
        let del = hits
            .area_of(&Target::Control("c_0".into(), Control::Delete))
            .unwrap();
        assert_eq!(
            hits.target_at(del.x, del.y),
            Some(&Target::Control("c_0".into(), Control::Delete))
        );
        let edit = hits
            .area_of(&Target::Control("c_0".into(), Control::Edit))
            .unwrap();
        assert!(edit.x < del.x);
        // Left of the controls is the card's text.
        assert_eq!(
            hits.target_at(edit.x - 3, edit.y),
            Some(&Target::Text("c_0".into()))
        );
    }

    #[test]
    fn editing_card_shows_buffer() {
        let (_spy, store) = spy_store(&["Original"]);
        let mut state = AppState::new(&store);
        state.session.begin("c_0", "Original");
        state.mode = Mode::Editing;
        if let Some(buf) = state.session.buf_mut() {
            for c in " draft".chars() {
                buf.insert(c);
            }
        }
        let (rows, _) = draw(&state, 70, 14);
        assert!(screen_contains(&rows, "Original draft"));
    }

    #[test]
    fn long_list_scrolls_to_selection() {
        let texts: Vec<String> = (0..10).map(|i| format!("card number {i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let (_spy, store) = spy_store(&refs);
        let mut state = AppState::new(&store);
        state.selected = 9;
        let (rows, hits) = draw(&state, 70, 14);
        assert!(screen_contains(&rows, "card number 9"));
        assert!(!screen_contains(&rows, "card number 0"));
        assert!(hits.area_of(&Target::Text("c_0".into())).is_none());
    }
}
