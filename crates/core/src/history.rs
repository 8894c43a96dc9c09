//! Bounded history of free-text commands with cursor recall.

use std::collections::VecDeque;

use crate::config::DEFAULT_HISTORY_CAPACITY;

/// Remembers the most recent free-text commands, oldest first.
///
/// Every [`History::add`] moves the cursor past the newest entry, so the
/// first [`History::recall_previous`] returns the entry just added. Both
/// directions clamp at either end.
#[derive(Debug, Clone)]
pub struct History {
    capacity: usize,
    entries: VecDeque<String>,
    cursor: usize,
}

impl History {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            cursor: 0,
        }
    }

    pub fn add(&mut self, text: impl Into<String>) {
        self.entries.push_back(text.into());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.reset_cursor();
    }

    /// Moves the cursor one past the newest entry.
    pub fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
    }

    /// Steps towards the oldest entry. Stays on the oldest once reached.
    pub fn recall_previous(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }

        self.cursor = self.cursor.saturating_sub(1);
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Steps towards the newest entry. Stays on the newest once reached.
    pub fn recall_next(&mut self) -> Option<&str> {
        let last = self.entries.len().checked_sub(1)?;

        self.cursor = (self.cursor + 1).min(last);
        self.entries.get(self.cursor).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(texts: &[&str]) -> History {
        let mut history = History::default();
        for text in texts {
            history.add(*text);
        }
        history
    }

    #[test]
    fn test_empty_history_returns_none() {
        let mut history = History::default();
        assert_eq!(history.recall_previous(), None);
        assert_eq!(history.recall_next(), None);
    }

    #[test]
    fn test_add_evicts_oldest_past_capacity() {
        let history = filled(&["a", "b", "c", "d", "e", "f"]);
        assert_eq!(history.entries().collect::<Vec<_>>(), ["b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_previous_starts_at_newest_and_clamps_at_oldest() {
        let mut history = filled(&["a", "b", "c", "d", "e", "f"]);
        let recalled: Vec<String> = (0..6)
            .map(|_| history.recall_previous().unwrap().to_string())
            .collect();
        assert_eq!(recalled, ["f", "e", "d", "c", "b", "b"]);
    }

    #[test]
    fn test_next_from_reset_cursor_clamps_at_newest() {
        let mut history = filled(&["a", "b", "c", "d", "e", "f"]);
        assert_eq!(history.recall_next(), Some("f"));
        assert_eq!(history.recall_next(), Some("f"));
    }

    #[test]
    fn test_walk_back_and_forth() {
        let mut history = filled(&["one", "two", "three"]);
        assert_eq!(history.recall_previous(), Some("three"));
        assert_eq!(history.recall_previous(), Some("two"));
        assert_eq!(history.recall_previous(), Some("one"));
        assert_eq!(history.recall_previous(), Some("one"));
        assert_eq!(history.recall_next(), Some("two"));
        assert_eq!(history.recall_next(), Some("three"));
        assert_eq!(history.recall_next(), Some("three"));
        assert_eq!(history.recall_previous(), Some("two"));
    }

    #[test]
    fn test_add_resets_cursor() {
        let mut history = filled(&["one", "two"]);
        history.recall_previous();
        history.recall_previous();
        history.add("three");
        assert_eq!(history.recall_previous(), Some("three"));
        assert_eq!(history.recall_previous(), Some("two"));
    }

    #[test]
    fn test_reset_cursor_returns_past_the_end() {
        let mut history = filled(&["one", "two"]);
        history.recall_previous();
        history.recall_previous();
        history.reset_cursor();
        assert_eq!(history.recall_previous(), Some("two"));
    }

    #[test]
    fn test_single_entry() {
        let mut history = filled(&["only"]);
        assert_eq!(history.recall_next(), Some("only"));
        assert_eq!(history.recall_previous(), Some("only"));
        assert_eq!(history.recall_previous(), Some("only"));
    }

    #[test]
    fn test_custom_capacity() {
        let mut history = History::new(2);
        history.add("a");
        history.add("b");
        history.add("c");
        assert_eq!(history.len(), 2);
        assert_eq!(history.capacity(), 2);
        assert_eq!(history.entries().collect::<Vec<_>>(), ["b", "c"]);
    }
}
