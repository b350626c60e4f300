use crate::app::TextBuffer;

/// How an inline edit ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// Write the edited text to the store (Enter, focus loss).
    Commit,
    /// Restore the pre-edit text without touching the store (Esc).
    Cancel,
}

/// What the caller must do after an edit session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Store `text` as the new text of `card_id` (empty text deletes the card).
    Commit { card_id: String, text: String },
    /// Nothing to store; the editor shows `restored` (the snapshot) again.
    Cancelled { card_id: String, restored: String },
}

/// The single in-flight inline edit, if any.
#[derive(Debug, Clone, Default)]
pub enum EditSession {
    #[default]
    Idle,
    Editing {
        card_id: String,
        /// Card text captured when the edit began.
        snapshot: String,
        /// Displayed text of the inline editor.
        buf: TextBuffer,
    },
}

impl EditSession {
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// Id of the card being edited.
    pub fn card_id(&self) -> Option<&str> {
        match self {
            Self::Editing { card_id, .. } => Some(card_id),
            Self::Idle => None,
        }
    }

    pub fn buf(&self) -> Option<&TextBuffer> {
        match self {
            Self::Editing { buf, .. } => Some(buf),
            Self::Idle => None,
        }
    }

    pub fn buf_mut(&mut self) -> Option<&mut TextBuffer> {
        match self {
            Self::Editing { buf, .. } => Some(buf),
            Self::Idle => None,
        }
    }

    /// Start editing `card_id` whose displayed text is `text`. The caret is
    /// placed after the last character.
    ///
    /// Callers must finish any active session first; an active session is
    /// replaced without being committed.
    pub fn begin(&mut self, card_id: &str, text: &str) {
        debug_assert!(!self.is_editing(), "finish the active edit before starting another");
        *self = Self::Editing {
            card_id: card_id.to_string(),
            snapshot: text.to_string(),
            buf: TextBuffer::new(text.to_string()),
        };
    }

    /// End the active session. Returns `None` when idle.
    pub fn finish(&mut self, how: Finish) -> Option<Outcome> {
        let Self::Editing {
            card_id,
            snapshot,
            buf,
        } = std::mem::take(self)
        else {
            return None;
        };
        match how {
            Finish::Commit => Some(Outcome::Commit {
                card_id,
                text: buf.input,
            }),
            Finish::Cancel => Some(Outcome::Cancelled {
                card_id,
                restored: snapshot,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_snapshots_and_places_caret_at_end() {
        let mut session = EditSession::default();
        session.begin("c_1", "héllo");
        assert_eq!(session.card_id(), Some("c_1"));
        let buf = session.buf().unwrap();
        assert_eq!(buf.input, "héllo");
        assert_eq!(buf.cursor, 5);
        if let EditSession::Editing { snapshot, .. } = &session {
            assert_eq!(snapshot, "héllo");
        }
    }

    #[test]
    fn test_commit_returns_edited_text() {
        let mut session = EditSession::default();
        session.begin("c_1", "old");
        let buf = session.buf_mut().unwrap();
        buf.backspace();
        buf.backspace();
        buf.backspace();
        for c in "new".chars() {
            buf.insert(c);
        }
        assert_eq!(
            session.finish(Finish::Commit),
            Some(Outcome::Commit {
                card_id: "c_1".into(),
                text: "new".into()
            })
        );
        assert!(!session.is_editing());
    }

    #[test]
    fn test_cancel_discards_edit() {
        let mut session = EditSession::default();
        session.begin("c_1", "old");
        session.buf_mut().unwrap().insert('!');
        assert_eq!(
            session.finish(Finish::Cancel),
            Some(Outcome::Cancelled {
                card_id: "c_1".into(),
                restored: "old".into()
            })
        );
        assert!(matches!(session, EditSession::Idle));
    }

    #[test]
    fn test_finish_when_idle_is_noop() {
        let mut session = EditSession::default();
        assert_eq!(session.finish(Finish::Cancel), None);
        assert_eq!(session.finish(Finish::Commit), None);
        assert!(session.buf().is_none());
    }
}
