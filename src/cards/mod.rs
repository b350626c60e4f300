pub mod storage;

use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use storage::{Persistence, StorageError};

/// A single persisted text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub text: String,
}

impl Card {
    pub fn new(text: String) -> Self {
        Self {
            id: generate_id(),
            text,
        }
    }
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut n: u128) -> String {
    if n == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// `c_` + base-36 millisecond timestamp + 5 random base-36 characters.
///
/// Unique for practical purposes within a session; not cryptographic.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let random = to_base36(uuid::Uuid::new_v4().as_u128());
    let suffix: String = random.chars().rev().take(5).collect();
    format!("c_{}{suffix}", to_base36(millis))
}

/// The ordered, newest-first card collection, written through to storage.
///
/// Every mutating method returns whether it changed (and persisted) the
/// collection. Missing ids are silent no-ops.
pub struct CardStore {
    cards: Vec<Card>,
    persistence: Persistence,
    write_error: Option<StorageError>,
}

impl CardStore {
    /// Build the store from whatever `persistence` currently holds.
    pub fn open(persistence: Persistence) -> Self {
        let cards = persistence.load();
        info!("event=store_open cards={}", cards.len());
        Self {
            cards,
            persistence,
            write_error: None,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    /// The most recent failed write, if any, clearing it.
    ///
    /// Interactive callers ignore this; the in-memory collection stays
    /// authoritative for the session. Scripted callers turn it into an error.
    pub fn take_write_error(&mut self) -> Option<StorageError> {
        self.write_error.take()
    }

    fn persist(&mut self) {
        if let Err(e) = self.persistence.save(&self.cards) {
            warn!(
                "event=store_save status=failed key={} error={e}",
                self.persistence.key()
            );
            self.write_error = Some(e);
        }
    }

    /// Prepend a new card. Empty (after trimming) text is refused.
    pub fn add_front(&mut self, text: &str) -> Option<&Card> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let card = Card::new(text.to_string());
        info!("event=card_add id={}", card.id);
        self.cards.insert(0, card);
        self.persist();
        self.cards.first()
    }

    /// Replace a card's text; empty (after trimming) text deletes the card.
    pub fn update_text(&mut self, id: &str, text: &str) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        let text = text.trim();
        if text.is_empty() {
            self.cards.remove(idx);
            info!("event=card_remove id={id} reason=empty_edit");
        } else {
            self.cards[idx].text = text.to_string();
            info!("event=card_update id={id}");
        }
        self.persist();
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        self.cards.remove(idx);
        info!("event=card_remove id={id}");
        self.persist();
        true
    }

    pub fn clear(&mut self) -> bool {
        if self.cards.is_empty() {
            return false;
        }
        info!("event=cards_clear count={}", self.cards.len());
        self.cards.clear();
        self.persist();
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::storage::tests::{spy_persistence, SpyStore};
    use super::*;

    pub(crate) fn spy_store(texts: &[&str]) -> (SpyStore, CardStore) {
        let (spy, persistence) = spy_persistence();
        let cards: Vec<Card> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Card {
                id: format!("c_{i}"),
                text: t.to_string(),
            })
            .collect();
        spy.put("cards", &serde_json::to_string(&cards).unwrap());
        (spy, CardStore::open(persistence))
    }

    fn texts(store: &CardStore) -> Vec<&str> {
        store.cards().iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        assert!(id.starts_with("c_"));
        assert!(id.len() > 7);
        assert!(id[2..].bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }

    #[test]
    fn test_generate_id_unique() {
        let ids: std::collections::HashSet<String> = (0..100).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_add_to_empty() {
        let (spy, mut store) = spy_store(&[]);
        let card = store.add_front("Buy milk").cloned().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.cards()[0], card);
        assert_eq!(card.text, "Buy milk");
        assert_eq!(spy.writes(), 1);
    }

    #[test]
    fn test_add_is_newest_first() {
        let (_spy, mut store) = spy_store(&[]);
        store.add_front("A");
        store.add_front("B");
        assert_eq!(texts(&store), vec!["B", "A"]);
    }

    #[test]
    fn test_add_trims_and_refuses_empty() {
        let (spy, mut store) = spy_store(&[]);
        assert!(store.add_front("   ").is_none());
        assert!(store.is_empty());
        assert_eq!(spy.writes(), 0);
        store.add_front("  padded  ");
        assert_eq!(texts(&store), vec!["padded"]);
    }

    #[test]
    fn test_update_text() {
        let (spy, mut store) = spy_store(&["old"]);
        assert!(store.update_text("c_0", "new"));
        assert_eq!(texts(&store), vec!["new"]);
        assert!(spy.value("cards").unwrap().contains("\"new\""));
    }

    #[test]
    fn test_update_to_empty_removes() {
        let (_spy, mut store) = spy_store(&["keep", "drop"]);
        assert!(store.update_text("c_1", "  "));
        assert_eq!(texts(&store), vec!["keep"]);
    }

    #[test]
    fn test_update_missing_is_noop() {
        let (spy, mut store) = spy_store(&["a"]);
        assert!(!store.update_text("nope", "x"));
        assert_eq!(spy.writes(), 0);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let (spy, mut store) = spy_store(&["a", "b"]);
        let before = spy.value("cards");
        assert!(!store.remove("nope"));
        assert_eq!(spy.writes(), 0);
        assert_eq!(spy.value("cards"), before);
        assert_eq!(texts(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_remove() {
        let (spy, mut store) = spy_store(&["a", "b"]);
        assert!(store.remove("c_0"));
        assert_eq!(texts(&store), vec!["b"]);
        assert_eq!(spy.writes(), 1);
    }

    #[test]
    fn test_clear() {
        let (spy, mut store) = spy_store(&["a", "b"]);
        assert!(store.clear());
        assert!(store.is_empty());
        assert_eq!(spy.writes(), 1);
        assert!(!store.clear());
        assert_eq!(spy.writes(), 1);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let (spy, mut store) = spy_store(&["a"]);
        spy.inner.borrow_mut().fail_writes = true;
        store.add_front("b");
        assert_eq!(texts(&store), vec!["b", "a"]);
        assert!(store.take_write_error().is_some());
        assert!(store.take_write_error().is_none());
        // Later mutations still apply in memory.
        store.remove("c_0");
        assert_eq!(texts(&store), vec!["b"]);
    }
}
