use std::time::{Duration, Instant};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use super::action::Action;
use crate::app::Mode;
use crate::view::Control;

/// What a screen region stands for. Targets are structural: a control is
/// identified by its card id and kind, never by its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    AddField,
    ClearAll,
    Text(String),
    Control(String, Control),
}

/// Screen regions recorded while drawing, most specific last.
#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, Target)>,
}

impl HitMap {
    pub fn push(&mut self, area: Rect, target: Target) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    /// The innermost target under `(column, row)`.
    pub fn target_at(&self, column: u16, row: u16) -> Option<&Target> {
        let pos = Position::new(column, row);
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(pos))
            .map(|(_, target)| target)
    }
}

#[cfg(test)]
impl HitMap {
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Area of the first region for `target`.
    pub fn area_of(&self, target: &Target) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(_, t)| t == target)
            .map(|(area, _)| *area)
    }
}

/// Detects double clicks: two presses on the same target within `window`.
#[derive(Debug)]
pub struct ClickTracker {
    window: Duration,
    last: Option<(Target, Instant)>,
}

impl ClickTracker {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Record a press on `target` at `now`. Returns true when it completes a
    /// double click; a third press starts over.
    pub fn click(&mut self, target: &Target, now: Instant) -> bool {
        if let Some((prev, at)) = &self.last {
            if prev == target && now.saturating_duration_since(*at) <= self.window {
                self.last = None;
                return true;
            }
        }
        self.last = Some((target.clone(), now));
        false
    }
}

/// Map a mouse event to a semantic action.
///
/// `editing` is the id of the card whose inline editor is open; presses
/// inside it keep the editor focused.
pub fn map_mouse(
    event: MouseEvent,
    hits: &HitMap,
    clicks: &mut ClickTracker,
    mode: &Mode,
    editing: Option<&str>,
    now: Instant,
) -> Action {
    // Confirm and help are modal.
    if matches!(mode, Mode::Confirm { .. } | Mode::Help) {
        return Action::None;
    }
    match event.kind {
        MouseEventKind::ScrollDown if matches!(mode, Mode::Normal) => Action::SelectNextCard,
        MouseEventKind::ScrollUp if matches!(mode, Mode::Normal) => Action::SelectPrevCard,
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(target) = hits.target_at(event.column, event.row) else {
                return match mode {
                    Mode::AddForm | Mode::Editing => Action::Blur,
                    _ => Action::None,
                };
            };
            match target {
                Target::AddField => Action::FocusAddForm,
                Target::ClearAll => Action::ClearAll,
                Target::Control(card_id, control) => Action::CardControl {
                    card_id: card_id.clone(),
                    control: *control,
                },
                Target::Text(card_id) if editing == Some(card_id.as_str()) => Action::None,
                Target::Text(card_id) => {
                    if clicks.click(target, now) {
                        Action::EditCardText(card_id.clone())
                    } else {
                        Action::SelectCard(card_id.clone())
                    }
                }
            }
        }
        _ => Action::None,
    }
}
