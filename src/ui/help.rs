use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};
use ratatui::Frame;

use super::theme::Theme;
use crate::input::keymap::{BindingGroup, HELP_GROUPS};

/// Width of the key column in the help panel.
const KEY_COLUMN: usize = 16;

pub fn render_help(f: &mut Frame, area: Rect) {
    let panel_area = super::centered_rect(area, 60, 80, 50, 20);

    f.render_widget(Clear, panel_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Theme::FG))
        .title(Span::styled(
            " cardlist help ",
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::new(2, 2, 1, 1));

    let inner = block.inner(panel_area);
    f.render_widget(block, panel_area);

    if inner.height == 0 {
        return;
    }

    let mut lines = help_lines(HELP_GROUPS);
    lines.push(Line::from(Span::styled(
        "Press Esc to close",
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
    )));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(paragraph, inner);
}

fn help_lines(groups: &[BindingGroup]) -> Vec<Line<'static>> {
    let key = Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD);
    let heading = Style::default()
        .fg(Theme::FG)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let mut lines = Vec::new();
    for group in groups {
        lines.push(Line::from(Span::styled(group.name, heading)));
        for binding in group.bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<KEY_COLUMN$}", binding.key), key),
                Span::styled(binding.description, Theme::dim_style()),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines
}
