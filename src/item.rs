//! Navigable items and the dataset that holds them.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};

/// One navigable node of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    /// A component branch auto-selects its first child when opened.
    #[serde(default)]
    pub is_component: bool,
    /// Roots render under a heading carrying their name.
    #[serde(default)]
    pub is_root: bool,
    /// Ordered child ids; declaration order is traversal order.
    #[serde(default)]
    pub child_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_component: false,
            is_root: false,
            child_ids: Vec::new(),
            parent_id: None,
        }
    }

    pub fn component(mut self) -> Self {
        self.is_component = true;
        self
    }

    pub fn root(mut self) -> Self {
        self.is_root = true;
        self
    }

    pub fn with_children<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.child_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn has_children(&self) -> bool {
        !self.child_ids.is_empty()
    }

    /// The heading this item is grouped under, if it is a grouping root.
    pub fn group_name(&self) -> Option<&str> {
        self.is_root.then_some(self.name.as_str())
    }
}

/// Read-only mapping from item id to [`Item`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSet {
    items: HashMap<String, Item>,
}

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from items in declaration order, rejecting repeated ids.
    pub fn try_from_items<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = Item>,
    {
        let mut dataset = DataSet::new();
        for item in items {
            if dataset.contains(&item.id) {
                return Err(NavError::DuplicateItem(item.id));
            }
            dataset.insert(item);
        }
        Ok(dataset)
    }

    /// Insert an item, returning the one it replaced.
    pub fn insert(&mut self, item: Item) -> Option<Item> {
        self.items.insert(item.id.clone(), item)
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Look up an item that the caller expects to exist.
    pub fn require(&self, id: &str) -> Result<&Item> {
        self.get(id)
            .ok_or_else(|| NavError::MissingItem(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Ids of the enclosing items of `id`, nearest first.
    ///
    /// Follows `parent_id` until it runs out, hits an unknown id, or would
    /// revisit an id already in the chain.
    pub fn ancestors(&self, id: &str) -> Vec<&str> {
        let mut chain: Vec<&str> = Vec::new();
        let mut current = self.get(id).and_then(|item| item.parent_id.as_deref());
        while let Some(parent) = current {
            if parent == id || chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = self.get(parent).and_then(|item| item.parent_id.as_deref());
        }
        chain
    }

    /// Check the dataset invariants for traversal from `root_ids`.
    ///
    /// Reports the first violation found; items are checked in id order so
    /// the result is stable.
    pub fn validate(&self, root_ids: &[String]) -> Result<()> {
        let mut ids: Vec<&String> = self.items.keys().collect();
        ids.sort();

        for id in ids {
            let item = &self.items[id];
            let mut seen = HashSet::new();
            for child in &item.child_ids {
                if child == &item.id {
                    return Err(NavError::SelfReference(item.id.clone()));
                }
                if !seen.insert(child.as_str()) {
                    return Err(NavError::DuplicateChild {
                        parent: item.id.clone(),
                        child: child.clone(),
                    });
                }
                if !self.contains(child) {
                    return Err(NavError::DanglingChild {
                        parent: item.id.clone(),
                        child: child.clone(),
                    });
                }
            }
        }

        let mut path = Vec::new();
        for root in root_ids {
            self.check_acyclic(root, &mut path)?;
        }
        Ok(())
    }

    fn check_acyclic<'a>(&'a self, id: &'a str, path: &mut Vec<&'a str>) -> Result<()> {
        if path.contains(&id) {
            return Err(NavError::Cycle(id.to_string()));
        }
        let item = self.require(id)?;
        path.push(id);
        for child in &item.child_ids {
            self.check_acyclic(child, path)?;
        }
        path.pop();
        Ok(())
    }
}

/// Later items replace earlier ones with the same id. Use
/// [`DataSet::try_from_items`] for untrusted input.
impl FromIterator<Item> for DataSet {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        let mut dataset = DataSet::new();
        for item in iter {
            dataset.insert(item);
        }
        dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> DataSet {
        DataSet::from_iter([
            Item::new("components", "Components")
                .root()
                .with_children(["button"]),
            Item::new("button", "Button")
                .component()
                .with_parent("components")
                .with_children(["button--primary", "button--secondary"]),
            Item::new("button--primary", "Primary").with_parent("button"),
            Item::new("button--secondary", "Secondary").with_parent("button"),
        ])
    }

    #[test]
    fn test_item_deserializes_camel_case_with_defaults() {
        let item: Item = serde_json::from_str(
            r#"{"id": "button", "name": "Button", "isComponent": true, "childIds": ["a", "b"]}"#,
        )
        .unwrap();
        assert!(item.is_component);
        assert!(!item.is_root);
        assert_eq!(item.child_ids, ids(&["a", "b"]));
        assert_eq!(item.parent_id, None);
    }

    #[test]
    fn test_group_name_only_for_roots() {
        let dataset = sample();
        assert_eq!(
            dataset.get("components").unwrap().group_name(),
            Some("Components")
        );
        assert_eq!(dataset.get("button").unwrap().group_name(), None);
    }

    #[test]
    fn test_require_missing_item() {
        let dataset = sample();
        let err = dataset.require("nope").unwrap_err();
        assert!(matches!(err, NavError::MissingItem(ref id) if id == "nope"));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let dataset = sample();
        assert_eq!(
            dataset.ancestors("button--primary"),
            vec!["button", "components"]
        );
        assert!(dataset.ancestors("components").is_empty());
        assert!(dataset.ancestors("unknown").is_empty());
    }

    #[test]
    fn test_ancestors_stops_on_parent_loop() {
        let dataset = DataSet::from_iter([
            Item::new("a", "A").with_parent("b"),
            Item::new("b", "B").with_parent("a"),
        ]);
        assert_eq!(dataset.ancestors("a"), vec!["b"]);
    }

    #[test]
    fn test_try_from_items_rejects_repeated_id() {
        let err = DataSet::try_from_items([Item::new("a", "First"), Item::new("a", "Second")])
            .unwrap_err();
        assert!(matches!(err, NavError::DuplicateItem(ref id) if id == "a"));

        let dataset =
            DataSet::try_from_items([Item::new("a", "A"), Item::new("b", "B")]).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_validate_accepts_forest() {
        assert!(sample().validate(&ids(&["components"])).is_ok());
    }

    #[test]
    fn test_validate_rejects_self_reference() {
        let dataset = DataSet::from_iter([Item::new("a", "A").with_children(["a"])]);
        let err = dataset.validate(&ids(&["a"])).unwrap_err();
        assert!(matches!(err, NavError::SelfReference(ref id) if id == "a"));
    }

    #[test]
    fn test_validate_rejects_duplicate_child() {
        let dataset = DataSet::from_iter([
            Item::new("a", "A").with_children(["b", "b"]),
            Item::new("b", "B"),
        ]);
        let err = dataset.validate(&ids(&["a"])).unwrap_err();
        assert!(matches!(err, NavError::DuplicateChild { ref child, .. } if child == "b"));
    }

    #[test]
    fn test_validate_rejects_dangling_child() {
        let dataset = DataSet::from_iter([Item::new("a", "A").with_children(["b"])]);
        let err = dataset.validate(&ids(&["a"])).unwrap_err();
        assert!(matches!(err, NavError::DanglingChild { ref child, .. } if child == "b"));
    }

    #[test]
    fn test_validate_rejects_cycle() {
        let dataset = DataSet::from_iter([
            Item::new("a", "A").with_children(["b"]),
            Item::new("b", "B").with_children(["a"]),
        ]);
        let err = dataset.validate(&ids(&["a"])).unwrap_err();
        assert!(matches!(err, NavError::Cycle(ref id) if id == "a"));
    }

    #[test]
    fn test_validate_rejects_missing_root() {
        let err = sample().validate(&ids(&["ghost"])).unwrap_err();
        assert!(matches!(err, NavError::MissingItem(ref id) if id == "ghost"));
    }
}
