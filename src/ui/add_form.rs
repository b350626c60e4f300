use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use super::theme::Theme;
use crate::app::{AppState, Mode};
use crate::input::mouse::{HitMap, Target};

const PLACEHOLDER: &str = "Write a card and press Enter";
const CLEAR_ALL_LABEL: &str = "clear all";

/// Top row: the add field and the clear-all control.
pub fn render_add_form(f: &mut Frame, area: Rect, state: &AppState, hits: &mut HitMap) {
    let button_width = CLEAR_ALL_LABEL.len() as u16 + 4;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(8), Constraint::Length(button_width)])
        .split(area);

    render_field(f, chunks[0], state);
    hits.push(chunks[0], Target::AddField);

    render_clear_all(f, chunks[1], state.card_count() > 0);
    hits.push(chunks[1], Target::ClearAll);
}

fn render_field(f: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.mode == Mode::AddForm;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Theme::frame_border(focused)))
        .title(Span::styled(
            " New card ",
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if state.draft.input.is_empty() && !focused {
        f.render_widget(
            Paragraph::new(Span::styled(PLACEHOLDER, Theme::dim_style())),
            inner,
        );
        return;
    }

    let (shown, caret) = super::scroll_to_cursor(&state.draft, inner.width);
    f.render_widget(Paragraph::new(Line::from(shown)), inner);
    if focused {
        f.set_cursor_position(Position::new(inner.x + caret, inner.y));
    }
}

fn render_clear_all(f: &mut Frame, area: Rect, enabled: bool) {
    let style = if enabled {
        Style::default().fg(Theme::DANGER)
    } else {
        Theme::dim_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(Span::styled(CLEAR_ALL_LABEL, style)).centered(),
        inner,
    );
}
