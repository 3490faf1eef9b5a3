//! Bounded undo log: FIFO eviction, LIFO undo.

use std::collections::VecDeque;

use shift_roster_sdk::{CellStylePatch, HistoryChange, HistoryEntry};

use super::cells::CellStore;

#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl HistoryStack {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Appends `entry`, evicting the oldest entries beyond the limit.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop_back()
    }

    /// Pops the newest entry and restores its old value or style field.
    ///
    /// Returns the undone entry, `None` when the stack is empty.
    pub fn undo_into(&mut self, cells: &mut CellStore) -> Option<HistoryEntry> {
        let entry = self.pop()?;
        apply_inverse(&entry, cells);
        Some(entry)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Restores the pre-edit state of one entry. Replaying is idempotent.
pub fn apply_inverse(entry: &HistoryEntry, cells: &mut CellStore) {
    let key = entry.key.clone();
    match &entry.change {
        HistoryChange::Value { old, .. } => {
            cells.set(key, old.clone());
        }
        HistoryChange::Color { old, .. } => {
            cells.set_style(key, CellStylePatch::color(old.clone()));
        }
        HistoryChange::FontSize { old, .. } => {
            cells.set_style(key, CellStylePatch::font_size(*old));
        }
    }
}
