//! Projection of the card collection into display nodes.
//!
//! The view is rebuilt from scratch after every mutation; nothing here keeps
//! state between calls.

use crate::cards::Card;

pub const EMPTY_MESSAGE: &str = "Nothing here yet. Add your first card above ↑";
pub const CARD_HINT: &str = "Double-click or e: edit · Enter: save · Esc: cancel";

/// A per-card control, identified structurally rather than by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Edit,
    Delete,
}

impl Control {
    pub const ALL: [Control; 2] = [Self::Edit, Self::Delete];

    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Delete => "del",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    /// Initial content of the card's editable text region.
    pub text: String,
    pub controls: [Control; 2],
    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    /// Placeholder shown for an empty collection. Has no controls.
    Empty { message: &'static str },
    Card(CardView),
}

/// Project `cards` into display nodes, preserving collection order.
pub fn project(cards: &[Card]) -> Vec<ViewNode> {
    if cards.is_empty() {
        return vec![ViewNode::Empty {
            message: EMPTY_MESSAGE,
        }];
    }
    cards
        .iter()
        .map(|card| {
            ViewNode::Card(CardView {
                id: card.id.clone(),
                text: card.text.clone(),
                controls: Control::ALL,
                hint: CARD_HINT,
            })
        })
        .collect()
}

/// The card nodes of a view, skipping the placeholder.
pub fn card_views(view: &[ViewNode]) -> impl Iterator<Item = &CardView> {
    view.iter().filter_map(|node| match node {
        ViewNode::Card(card) => Some(card),
        ViewNode::Empty { .. } => None,
    })
}
