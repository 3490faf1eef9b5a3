//! Sparse cell value and style maps: the ground truth of the grid.
//!
//! `set` and `set_style` are the only mutation primitives; manual edits,
//! auto-assignment and undo all go through them.

use std::collections::HashMap;

use shift_roster_sdk::{CellKey, CellStyle, CellStylePatch, Member, RowType};

/// Value and style state of one department-month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStore {
    values: HashMap<CellKey, String>,
    styles: HashMap<CellKey, CellStyle>,
}

impl CellStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value at `key`, `""` when never written.
    #[must_use]
    pub fn get(&self, key: &CellKey) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    /// Writes `value`; the empty string removes the entry.
    ///
    /// Returns the previous value.
    pub fn set(&mut self, key: CellKey, value: impl Into<String>) -> String {
        let value = value.into();
        let previous = if value.is_empty() {
            self.values.remove(&key)
        } else {
            self.values.insert(key, value)
        };
        previous.unwrap_or_default()
    }

    /// Style at `key`, the default style when never written.
    #[must_use]
    pub fn style(&self, key: &CellKey) -> CellStyle {
        self.styles.get(key).cloned().unwrap_or_default()
    }

    /// Merges `patch` into the style at `key`.
    ///
    /// Returns the previous style.
    pub fn set_style(&mut self, key: CellKey, patch: CellStylePatch) -> CellStyle {
        let entry = self.styles.entry(key).or_default();
        let previous = entry.clone();
        if let Some(color) = patch.text_color {
            entry.text_color = color;
        }
        if let Some(size) = patch.font_size {
            entry.font_size = size;
        }
        previous
    }

    /// `(top, bottom)` values of a member-day.
    #[must_use]
    pub fn day_values(&self, member_id: &str, day_index: u32) -> (&str, &str) {
        (
            self.get(&CellKey::top(member_id, day_index)),
            self.get(&CellKey::bottom(member_id, day_index)),
        )
    }

    /// Whether any of `members` has a non-empty cell on `day_index`.
    #[must_use]
    pub fn any_filled<'a>(
        &self,
        members: impl IntoIterator<Item = &'a Member>,
        day_index: u32,
    ) -> bool {
        members.into_iter().any(|m| {
            RowType::ALL
                .iter()
                .any(|row| !self.get(&CellKey::new(m.id.as_str(), day_index, *row)).is_empty())
        })
    }

    /// Non-empty values.
    pub fn values(&self) -> impl Iterator<Item = (&CellKey, &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Explicit styles, including residual styles of cleared cells.
    pub fn styles(&self) -> impl Iterator<Item = (&CellKey, &CellStyle)> {
        self.styles.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.styles.is_empty()
    }

    /// Drops all values and styles.
    pub fn clear(&mut self) {
        self.values.clear();
        self.styles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shift_roster_sdk::MemberRole;

    #[test]
    fn test_unwritten_keys_yield_defaults() {
        let store = CellStore::new();
        let key = CellKey::top("m1", 3);
        assert_eq!(store.get(&key), "");
        assert_eq!(store.style(&key), CellStyle::default());
        assert_eq!(store.get(&key), "");
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_returns_previous_and_empty_removes() {
        let mut store = CellStore::new();
        let key = CellKey::top("m1", 3);
        assert_eq!(store.set(key.clone(), "M"), "");
        assert_eq!(store.set(key.clone(), "N"), "M");
        assert_eq!(store.set(key.clone(), ""), "N");
        assert_eq!(store.get(&key), "");
        assert_eq!(store.values().count(), 0);
    }

    #[test]
    fn test_set_style_patches_fields_independently() {
        let mut store = CellStore::new();
        let key = CellKey::bottom("m1", 0);

        let before = store.set_style(key.clone(), CellStylePatch::color("red"));
        assert_eq!(before, CellStyle::default());
        store.set_style(key.clone(), CellStylePatch::font_size(18));

        let style = store.style(&key);
        assert_eq!(style.text_color, "red");
        assert_eq!(style.font_size, 18);
    }

    #[test]
    fn test_style_survives_value_clear() {
        let mut store = CellStore::new();
        let key = CellKey::top("m1", 1);
        store.set(key.clone(), "M");
        store.set_style(key.clone(), CellStylePatch::color("red"));
        store.set(key.clone(), "");

        assert_eq!(store.get(&key), "");
        assert_eq!(store.style(&key).text_color, "red");
        assert!(!store.is_empty());

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_any_filled_checks_both_rows() {
        let mut store = CellStore::new();
        let members = vec![
            Member::new("a1", MemberRole::NursingAssistant),
            Member::new("a2", MemberRole::NursingAssistant),
        ];
        assert!(!store.any_filled(&members, 4));

        store.set(CellKey::bottom("a2", 4), "E");
        assert!(store.any_filled(&members, 4));
        assert!(!store.any_filled(&members, 5));
        assert_eq!(store.day_values("a2", 4), ("", "E"));
    }
}
