use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use crate::app::{AppState, Mode};
use crate::input::keymap::mode_bindings;

pub fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    // The confirmation prompt takes over the entire bar.
    if let Mode::Confirm { prompt, .. } = &state.mode {
        let line = Line::from(Span::styled(format!(" {prompt} (y/n) "), Theme::badge_style()));
        f.render_widget(Paragraph::new(line).style(Theme::status_style()), area);
        return;
    }

    let left = build_left_zone(state);
    let right = build_right_zone(state);

    let left_width: usize = left.iter().map(|s| s.content.width()).sum();
    let right_width: usize = right.iter().map(|s| s.content.width()).sum();
    let center_avail = (area.width as usize).saturating_sub(left_width + right_width);
    let center = build_center_zone(state, center_avail);

    let mut spans = left;
    spans.extend(center);
    spans.extend(right);

    let paragraph = Paragraph::new(Line::from(spans)).style(Theme::status_style());
    f.render_widget(paragraph, area);
}

fn mode_label(mode: &Mode) -> &'static str {
    match mode {
        Mode::Normal => "NORMAL",
        Mode::AddForm => "ADD",
        Mode::Editing => "EDIT",
        Mode::Confirm { .. } => "CONFIRM",
        Mode::Help => "HELP",
    }
}

/// Mode badge + app name.
fn build_left_zone(state: &AppState) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!(" {} ", mode_label(&state.mode)), Theme::badge_style()),
        Span::raw(" "),
        Span::styled("cardlist ", Theme::dim_style()),
    ]
}

/// Selected position out of the card count.
fn build_right_zone(state: &AppState) -> Vec<Span<'static>> {
    let count = state.card_count();
    let pos = if count > 0 {
        format!("{}/{count} ", state.selected + 1)
    } else {
        "0 ".to_string()
    };
    vec![Span::styled(pos, Style::default().fg(Theme::FG))]
}

/// Notification if any, else the key hints for the current mode.
fn build_center_zone(state: &AppState, avail_width: usize) -> Vec<Span<'static>> {
    let (text, color) = match &state.notification {
        Some(notif) => (notif.clone(), Theme::FG),
        None => {
            let hints: Vec<String> = mode_bindings(&state.mode)
                .iter()
                .map(|b| format!("{}: {}", b.key, b.description))
                .collect();
            let hints = if hints.is_empty() {
                "?: help".to_string()
            } else {
                hints.join(" · ")
            };
            (hints, Theme::DIM)
        }
    };

    let width = text.width();
    if width >= avail_width {
        let truncated = super::card_list::truncate(&text, avail_width);
        return vec![Span::styled(truncated, Style::default().fg(color))];
    }
    let pad_total = avail_width - width;
    let pad_left = pad_total / 2;
    vec![
        Span::raw(" ".repeat(pad_left)),
        Span::styled(text, Style::default().fg(color)),
        Span::raw(" ".repeat(pad_total - pad_left)),
    ]
}
