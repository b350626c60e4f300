use crate::view::Control;

/// All possible semantic actions in cardlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    SelectPrevCard,
    SelectNextCard,
    JumpToFirstCard,
    JumpToLastCard,
    SelectCard(String),

    // Card actions on the selected card
    EditCard,
    DeleteCard,

    // Card actions on a specific card (pointer)
    CardControl { card_id: String, control: Control },
    EditCardText(String),

    // List actions
    FocusAddForm,
    ClearAll,

    // Focus left the focused field without confirm/cancel
    Blur,

    // Text input (add form and inline editor)
    InputConfirm,
    InputCancel,
    InputChar(char),
    InputBackspace,
    InputDelete,
    InputLeft,
    InputRight,
    InputHome,
    InputEnd,
    InputDeleteWord,

    // Confirmation
    Confirm,
    Deny,

    // Panels
    ShowHelp,
    ClosePanel,
    Quit,

    // No-op
    None,
}
