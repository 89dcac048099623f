//! Keyed boolean stores backing the Expanded and Selected state.

use std::collections::HashMap;

/// Mapping from item id to boolean. An absent key reads as `false`.
///
/// Equality is semantic: two sets are equal when the same ids are `true`,
/// so `{x: false}` equals `{}`.
#[derive(Debug, Clone, Default)]
pub struct BooleanSet {
    entries: HashMap<String, bool>,
}

impl BooleanSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> bool {
        self.entries.get(id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: impl Into<String>, value: bool) {
        self.entries.insert(id.into(), value);
    }

    /// Flip the value for `id`, creating the key on first use. Returns the new value.
    pub fn toggle(&mut self, id: &str) -> bool {
        let value = !self.get(id);
        self.entries.insert(id.to_string(), value);
        value
    }

    /// A copy of this set with `id` flipped.
    pub fn toggled(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.toggle(id);
        next
    }

    /// Whether `id` has ever been recorded, regardless of its value.
    pub fn contains_key(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Ids currently set to `true`, sorted.
    pub fn active_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, value)| **value)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl PartialEq for BooleanSet {
    fn eq(&self, other: &Self) -> bool {
        self.active_ids() == other.active_ids()
    }
}

impl Eq for BooleanSet {}

impl<K: Into<String>> FromIterator<(K, bool)> for BooleanSet {
    fn from_iter<T: IntoIterator<Item = (K, bool)>>(iter: T) -> Self {
        let mut set = BooleanSet::new();
        for (id, value) in iter {
            set.set(id, value);
        }
        set
    }
}
