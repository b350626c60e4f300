use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action::Action;
use crate::app::Mode;

/// Map a key event to a semantic action based on current mode.
pub fn map_key(key: KeyEvent, mode: &Mode) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    match mode {
        Mode::Normal => map_normal(key),
        Mode::AddForm => map_input(key),
        Mode::Editing => map_editing(key),
        Mode::Confirm { .. } => map_confirm(key),
        Mode::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Action::ClosePanel,
            _ => Action::None,
        },
    }
}

fn map_normal(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Action::SelectNextCard,
        KeyCode::Char('k') | KeyCode::Up => Action::SelectPrevCard,
        KeyCode::Char('g') | KeyCode::Home => Action::JumpToFirstCard,
        KeyCode::Char('G') | KeyCode::End => Action::JumpToLastCard,
        KeyCode::Char('a') | KeyCode::Char('n') | KeyCode::Char('i') => Action::FocusAddForm,
        KeyCode::Char('e') | KeyCode::Enter => Action::EditCard,
        KeyCode::Char('d') | KeyCode::Delete => Action::DeleteCard,
        KeyCode::Char('C') => Action::ClearAll,
        KeyCode::Char('?') => Action::ShowHelp,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}

fn map_input(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::InputConfirm,
        KeyCode::Esc => Action::InputCancel,
        KeyCode::Tab | KeyCode::BackTab => Action::Blur,
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::InputHome,
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::InputEnd,
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Action::InputDeleteWord
        }
        KeyCode::Char(c) => Action::InputChar(c),
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Delete => Action::InputDelete,
        KeyCode::Left => Action::InputLeft,
        KeyCode::Right => Action::InputRight,
        KeyCode::Home => Action::InputHome,
        KeyCode::End => Action::InputEnd,
        _ => Action::None,
    }
}

/// The inline editor is single-line: moving up or down leaves it.
fn map_editing(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up | KeyCode::Down => Action::Blur,
        _ => map_input(key),
    }
}

fn map_confirm(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => Action::Confirm,
        KeyCode::Char('n') | KeyCode::Esc => Action::Deny,
        _ => Action::None,
    }
}

// ---------------------------------------------------------------------------
// Binding registry — single source of truth for keybinding documentation.
// Used by the help overlay and the status bar hints.
// ---------------------------------------------------------------------------

/// A documented keybinding for display in help and hints.
pub struct Binding {
    pub key: &'static str,
    pub description: &'static str,
}

/// A group of related bindings (one section in help).
pub struct BindingGroup {
    pub name: &'static str,
    pub bindings: &'static [Binding],
}

pub const NORMAL_BINDINGS: &[Binding] = &[
    Binding { key: "j / k", description: "Move between cards" },
    Binding { key: "g / G", description: "First / last card" },
    Binding { key: "a", description: "Add a card" },
    Binding { key: "e / Enter", description: "Edit card" },
    Binding { key: "d", description: "Delete card" },
    Binding { key: "C", description: "Clear all cards" },
    Binding { key: "?", description: "Help" },
    Binding { key: "q", description: "Quit" },
];

pub const ADD_FORM_BINDINGS: &[Binding] = &[
    Binding { key: "Enter", description: "Add card" },
    Binding { key: "Esc / Tab", description: "Leave the form" },
    Binding { key: "Ctrl-w", description: "Delete word" },
];

pub const EDIT_BINDINGS: &[Binding] = &[
    Binding { key: "Enter", description: "Save" },
    Binding { key: "Esc", description: "Cancel" },
    Binding { key: "Tab / ↑ / ↓", description: "Leave (saves)" },
    Binding { key: "empty text", description: "Deletes the card" },
];

pub const MOUSE_BINDINGS: &[Binding] = &[
    Binding { key: "double-click", description: "Edit card text" },
    Binding { key: "[edit] [del]", description: "Card controls" },
    Binding { key: "[clear all]", description: "Clear all cards" },
    Binding { key: "click outside", description: "Leave the editor (saves)" },
];

/// All binding groups for the help overlay.
pub const HELP_GROUPS: &[BindingGroup] = &[
    BindingGroup { name: "Cards", bindings: NORMAL_BINDINGS },
    BindingGroup { name: "Add form", bindings: ADD_FORM_BINDINGS },
    BindingGroup { name: "Editing", bindings: EDIT_BINDINGS },
    BindingGroup { name: "Mouse", bindings: MOUSE_BINDINGS },
];

/// Bindings summarized in the status bar for the current mode.
pub fn mode_bindings(mode: &Mode) -> &'static [Binding] {
    match mode {
        Mode::AddForm => ADD_FORM_BINDINGS,
        Mode::Editing => EDIT_BINDINGS,
        _ => &[],
    }
}
