use ratatui::style::{Color, Modifier, Style};

/// Color theme for cardlist.
///
/// Text and chrome use the terminal's default foreground (Color::Reset).
/// Color is reserved for destructive controls, the open editor, and errors.
pub struct Theme;

impl Theme {
    pub const FG: Color = Color::Reset;
    pub const DIM: Color = Color::DarkGray;

    // Frames
    pub const BORDER: Color = Color::Reset;
    pub const FOCUSED_BORDER: Color = Color::Cyan;

    // Cards
    pub const CARD_BORDER: Color = Color::Reset;
    pub const CARD_TEXT: Color = Color::Reset;
    pub const EDITOR: Color = Color::Cyan;

    // Controls
    pub const CONTROL: Color = Color::Reset;
    pub const DANGER: Color = Color::Red;

    pub fn dim_style() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_style() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn badge_style() -> Style {
        Style::default()
            .fg(Self::FG)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    /// Border color of a frame that may hold keyboard focus.
    pub fn frame_border(focused: bool) -> Color {
        if focused {
            Self::FOCUSED_BORDER
        } else {
            Self::BORDER
        }
    }
}
