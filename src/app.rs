use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, info};
use ratatui::DefaultTerminal;

use crate::cards::CardStore;
use crate::config::UiConfig;
use crate::edit::{EditSession, Finish, Outcome};
use crate::input::action::Action;
use crate::input::keymap::map_key;
use crate::input::mouse::{map_mouse, ClickTracker, HitMap};
use crate::view::{self, card_views, CardView, Control, ViewNode};

/// Reusable text editing buffer with cursor.
///
/// `cursor` is a **char index** (not byte index), always in `0..=char_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    pub input: String,
    pub cursor: usize,
}

impl TextBuffer {
    /// Buffer holding `input` with the cursor after the last character.
    pub fn new(input: String) -> Self {
        let cursor = input.chars().count();
        Self { input, cursor }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    fn len(&self) -> usize {
        self.input.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert(&mut self, c: char) {
        // The inline editor and the add field are single-line.
        if c == '\n' || c == '\r' {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.input.remove(at);
    }

    /// Remove the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_offset(self.cursor);
            self.input.remove(at);
        }
    }

    /// Remove the word before the cursor, plus any whitespace after it.
    pub fn delete_word(&mut self) {
        let end = self.byte_offset(self.cursor);
        let start = self.input[..end]
            .trim_end()
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        self.cursor = self.input[..start].chars().count();
        self.input.drain(start..end);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.len();
    }
}

/// Current interaction mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// The add field has focus. Its text lives in [`AppState::draft`] so it
    /// survives leaving the field.
    AddForm,
    /// An inline editor is open; see [`AppState::session`].
    Editing,
    Confirm {
        prompt: &'static str,
        on_confirm: ConfirmTarget,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmTarget {
    ClearAll,
}

/// Global application state.
pub struct AppState {
    pub mode: Mode,
    pub session: EditSession,
    pub draft: TextBuffer,
    /// Display nodes, rebuilt from the store after every mutation.
    pub view: Vec<ViewNode>,
    /// Index into the card nodes of `view`.
    pub selected: usize,
    pub notification: Option<String>,
    pub notification_expires: Option<Instant>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(store: &CardStore) -> Self {
        let mut state = Self {
            mode: Mode::Normal,
            session: EditSession::default(),
            draft: TextBuffer::empty(),
            view: Vec::new(),
            selected: 0,
            notification: None,
            notification_expires: None,
            should_quit: false,
        };
        state.refresh(store);
        state
    }

    /// Discard the current view and project the store again.
    pub fn refresh(&mut self, store: &CardStore) {
        self.view = view::project(store.cards());
        self.clamp_selection();
        debug!("event=render cards={}", store.len());
    }

    pub fn card_count(&self) -> usize {
        card_views(&self.view).count()
    }

    pub fn selected_card(&self) -> Option<&CardView> {
        card_views(&self.view).nth(self.selected)
    }

    fn select_id(&mut self, card_id: &str) {
        if let Some(idx) = card_views(&self.view).position(|c| c.id == card_id) {
            self.selected = idx;
        }
    }

    /// Show a transient notification.
    pub fn notify(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_expires = Some(Instant::now() + Duration::from_secs(3));
    }

    /// Clear expired notifications.
    pub fn tick_notification(&mut self) {
        if let Some(expires) = self.notification_expires {
            if Instant::now() >= expires {
                self.notification = None;
                self.notification_expires = None;
            }
        }
    }

    /// Clamp the selected index to the number of cards.
    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.card_count().saturating_sub(1));
    }
}

pub fn run(
    terminal: &mut DefaultTerminal,
    store: &mut CardStore,
    ui: &UiConfig,
) -> color_eyre::Result<()> {
    let mut state = AppState::new(store);
    let mut hits = HitMap::default();
    let mut clicks = ClickTracker::new(Duration::from_millis(ui.double_click_ms));
    info!("event=tui_start cards={}", store.len());

    loop {
        state.tick_notification();

        terminal.draw(|f| hits = crate::ui::render(f, &state))?;

        if event::poll(Duration::from_millis(100))? {
            let action = map_event(event::read()?, &state, &hits, &mut clicks, Instant::now());
            process_action(store, &mut state, action);

            if state.should_quit {
                break;
            }
        }
    }

    info!("event=tui_stop cards={}", store.len());
    Ok(())
}

/// Map a terminal event to an action. Only key presses count, and losing
/// terminal focus blurs the focused field.
fn map_event(
    event: Event,
    state: &AppState,
    hits: &HitMap,
    clicks: &mut ClickTracker,
    now: Instant,
) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key, &state.mode),
        Event::Mouse(mouse) => map_mouse(
            mouse,
            hits,
            clicks,
            &state.mode,
            state.session.card_id(),
            now,
        ),
        Event::FocusLost => Action::Blur,
        _ => Action::None,
    }
}

fn process_action(store: &mut CardStore, state: &mut AppState, action: Action) {
    match action {
        Action::None => {}

        // Navigation
        Action::SelectPrevCard
        | Action::SelectNextCard
        | Action::JumpToFirstCard
        | Action::JumpToLastCard
        | Action::SelectCard(_) => {
            handle_navigation(store, state, action);
        }

        // Card & list actions
        Action::EditCard
        | Action::DeleteCard
        | Action::CardControl { .. }
        | Action::EditCardText(_)
        | Action::FocusAddForm
        | Action::ClearAll => {
            handle_card_action(store, state, action);
        }

        Action::Blur => blur(store, state),

        // Text input delegation
        Action::InputChar(_)
        | Action::InputBackspace
        | Action::InputDelete
        | Action::InputLeft
        | Action::InputRight
        | Action::InputHome
        | Action::InputEnd
        | Action::InputDeleteWord
        | Action::InputConfirm
        | Action::InputCancel => {
            handle_input(store, state, action);
        }

        // Confirmation
        Action::Confirm | Action::Deny => {
            handle_confirm(store, state, action);
        }

        Action::ShowHelp => {
            blur(store, state);
            state.mode = Mode::Help;
        }
        Action::ClosePanel => state.mode = Mode::Normal,
        Action::Quit => {
            finish_edit(store, state, Finish::Commit);
            state.should_quit = true;
        }
    }

    // Save failures are logged by the store and never shown; the in-memory
    // cards stay authoritative.
    store.take_write_error();
}

// ---------------------------------------------------------------------------
// Focus and edit sessions
// ---------------------------------------------------------------------------

/// Focus leaves the focused field. An open editor commits; the add field
/// keeps its text.
fn blur(store: &mut CardStore, state: &mut AppState) {
    if state.session.is_editing() {
        finish_edit(store, state, Finish::Commit);
    } else if state.mode == Mode::AddForm {
        state.mode = Mode::Normal;
    }
}

fn finish_edit(store: &mut CardStore, state: &mut AppState, how: Finish) {
    let Some(outcome) = state.session.finish(how) else {
        return;
    };
    if state.mode == Mode::Editing {
        state.mode = Mode::Normal;
    }
    match outcome {
        Outcome::Commit { card_id, text } => {
            let emptied = text.trim().is_empty();
            if store.update_text(&card_id, &text) && emptied {
                state.notify("Card deleted (empty text)");
            }
        }
        Outcome::Cancelled { card_id, .. } => {
            debug!("event=edit_cancel id={card_id}");
        }
    }
    state.refresh(store);
}

// ---------------------------------------------------------------------------
// Per-card controls
// ---------------------------------------------------------------------------

/// Signature shared by the per-card control handlers.
pub type ControlHandler = fn(&mut CardStore, &mut AppState, &str);

impl Control {
    /// The handler bound to this control.
    pub fn handler(self) -> ControlHandler {
        match self {
            Control::Edit => begin_edit,
            Control::Delete => delete_card,
        }
    }
}

fn begin_edit(store: &mut CardStore, state: &mut AppState, card_id: &str) {
    if state.session.card_id() == Some(card_id) {
        state.mode = Mode::Editing;
        return;
    }
    // Opening an editor takes focus from any other field.
    blur(store, state);
    let Some(text) = card_views(&state.view)
        .find(|c| c.id == card_id)
        .map(|c| c.text.clone())
    else {
        return;
    };
    state.session.begin(card_id, &text);
    state.mode = Mode::Editing;
    state.select_id(card_id);
    debug!("event=edit_begin id={card_id}");
}

fn delete_card(store: &mut CardStore, state: &mut AppState, card_id: &str) {
    blur(store, state);
    if store.remove(card_id) {
        state.refresh(store);
        state.notify("Card deleted");
    }
}

// ---------------------------------------------------------------------------
// Handler: Navigation
// ---------------------------------------------------------------------------

fn handle_navigation(store: &mut CardStore, state: &mut AppState, action: Action) {
    match action {
        Action::SelectPrevCard => {
            state.selected = state.selected.saturating_sub(1);
        }
        Action::SelectNextCard => {
            state.selected += 1;
            state.clamp_selection();
        }
        Action::JumpToFirstCard => state.selected = 0,
        Action::JumpToLastCard => {
            state.selected = state.card_count().saturating_sub(1);
        }
        Action::SelectCard(card_id) => {
            blur(store, state);
            state.select_id(&card_id);
        }
        _ => unreachable!(),
    }
}

// ---------------------------------------------------------------------------
// Handler: Card and list actions
// ---------------------------------------------------------------------------

fn handle_card_action(store: &mut CardStore, state: &mut AppState, action: Action) {
    match action {
        Action::EditCard | Action::DeleteCard => {
            let control = if action == Action::EditCard {
                Control::Edit
            } else {
                Control::Delete
            };
            if let Some(card_id) = state.selected_card().map(|c| c.id.clone()) {
                control.handler()(store, state, &card_id);
            }
        }
        Action::CardControl { card_id, control } => {
            control.handler()(store, state, &card_id);
        }
        Action::EditCardText(card_id) => {
            Control::Edit.handler()(store, state, &card_id);
        }
        Action::FocusAddForm => {
            if state.mode != Mode::AddForm {
                blur(store, state);
                state.mode = Mode::AddForm;
            }
        }
        Action::ClearAll => {
            blur(store, state);
            if store.is_empty() {
                return;
            }
            state.mode = Mode::Confirm {
                prompt: "Delete all cards?",
                on_confirm: ConfirmTarget::ClearAll,
            };
        }
        _ => unreachable!(),
    }
}

// ---------------------------------------------------------------------------
// Handler: Text input (add field and inline editor)
// ---------------------------------------------------------------------------

fn active_buffer(state: &mut AppState) -> Option<&mut TextBuffer> {
    match state.mode {
        Mode::AddForm => Some(&mut state.draft),
        Mode::Editing => state.session.buf_mut(),
        _ => None,
    }
}

fn handle_input(store: &mut CardStore, state: &mut AppState, action: Action) {
    match action {
        Action::InputConfirm => match state.mode {
            Mode::AddForm => submit_add(store, state),
            Mode::Editing => finish_edit(store, state, Finish::Commit),
            _ => {}
        },
        Action::InputCancel => match state.mode {
            Mode::AddForm => state.mode = Mode::Normal,
            Mode::Editing => finish_edit(store, state, Finish::Cancel),
            _ => {}
        },
        edit => {
            let Some(buf) = active_buffer(state) else {
                return;
            };
            match edit {
                Action::InputChar(c) => buf.insert(c),
                Action::InputBackspace => buf.backspace(),
                Action::InputDelete => buf.delete(),
                Action::InputLeft => buf.move_left(),
                Action::InputRight => buf.move_right(),
                Action::InputHome => buf.home(),
                Action::InputEnd => buf.end(),
                Action::InputDeleteWord => buf.delete_word(),
                _ => unreachable!(),
            }
        }
    }
}

/// Submit the add field. Empty text leaves the field focused and untouched.
fn submit_add(store: &mut CardStore, state: &mut AppState) {
    let Some(card_id) = store.add_front(&state.draft.input).map(|c| c.id.clone()) else {
        return;
    };
    state.draft = TextBuffer::empty();
    state.refresh(store);
    state.select_id(&card_id);
    state.notify("Card added");
}

// ---------------------------------------------------------------------------
// Handler: Confirmation
// ---------------------------------------------------------------------------

fn handle_confirm(store: &mut CardStore, state: &mut AppState, action: Action) {
    match action {
        Action::Confirm => {
            let old_mode = std::mem::replace(&mut state.mode, Mode::Normal);
            if let Mode::Confirm {
                on_confirm: ConfirmTarget::ClearAll,
                ..
            } = old_mode
            {
                if store.clear() {
                    state.refresh(store);
                    state.notify("All cards deleted");
                }
            }
        }
        Action::Deny => {
            state.mode = Mode::Normal;
        }
        _ => unreachable!(),
    }
}
