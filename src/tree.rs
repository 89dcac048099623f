//! Tree traversal: turns a root id plus the state stores into a nested view.

use crate::error::Result;
use crate::interaction::ViewMode;
use crate::item::DataSet;
use crate::state::BooleanSet;

/// A branch row and, when expanded, its visible children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchView {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub is_component: bool,
    pub expanded: bool,
    pub selected: bool,
    /// Empty when collapsed.
    pub children: Vec<ViewNode>,
}

/// A childless row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafView {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub selected: bool,
}

/// Node of the view structure produced by [`build_view`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    Branch(BranchView),
    Leaf(LeafView),
}

impl ViewNode {
    pub fn id(&self) -> &str {
        match self {
            ViewNode::Branch(branch) => &branch.id,
            ViewNode::Leaf(leaf) => &leaf.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ViewNode::Branch(branch) => &branch.name,
            ViewNode::Leaf(leaf) => &leaf.name,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            ViewNode::Branch(branch) => branch.depth,
            ViewNode::Leaf(leaf) => leaf.depth,
        }
    }

    pub fn is_selected(&self) -> bool {
        match self {
            ViewNode::Branch(branch) => branch.selected,
            ViewNode::Leaf(leaf) => leaf.selected,
        }
    }

    /// Link target of the row: branches anchor in place, leaves route to
    /// the item in the given view mode.
    pub fn href(&self, view_mode: ViewMode) -> String {
        match self {
            ViewNode::Branch(branch) => format!("#{}", branch.id),
            ViewNode::Leaf(leaf) => leaf_href(&leaf.id, view_mode),
        }
    }

    /// Walk this node depth-first in display order.
    pub fn accept<V: ViewVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            ViewNode::Branch(branch) => {
                visitor.visit_branch(branch);
                for child in &branch.children {
                    child.accept(visitor);
                }
            }
            ViewNode::Leaf(leaf) => visitor.visit_leaf(leaf),
        }
    }
}

/// Route to an item in a view mode, e.g. `?path=/story/button--primary`.
pub fn leaf_href(id: &str, view_mode: ViewMode) -> String {
    format!("?path=/{}/{}", view_mode, id)
}

/// Per-variant callbacks for rendering a [`ViewNode`] tree.
pub trait ViewVisitor {
    /// Called before the branch's visible children.
    fn visit_branch(&mut self, branch: &BranchView);
    fn visit_leaf(&mut self, leaf: &LeafView);
}

/// Build the view rooted at `root_id`.
///
/// Children of a branch are visited only when the branch is expanded, in
/// `child_ids` order. Fails with [`crate::NavError::MissingItem`] when
/// `root_id` or any visited child is absent from the dataset.
pub fn build_view(
    dataset: &DataSet,
    expanded: &BooleanSet,
    selected: &BooleanSet,
    root_id: &str,
    depth: usize,
) -> Result<ViewNode> {
    let item = dataset.require(root_id)?;

    if !item.has_children() {
        return Ok(ViewNode::Leaf(LeafView {
            id: item.id.clone(),
            name: item.name.clone(),
            depth,
            selected: selected.get(&item.id),
        }));
    }

    let is_expanded = expanded.get(&item.id);
    let children = if is_expanded {
        item.child_ids
            .iter()
            .map(|child| build_view(dataset, expanded, selected, child, depth + 1))
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };

    Ok(ViewNode::Branch(BranchView {
        id: item.id.clone(),
        name: item.name.clone(),
        depth,
        is_component: item.is_component,
        expanded: is_expanded,
        selected: selected.get(&item.id),
        children,
    }))
}

/// Build one view per id, in order, all at `depth`.
pub fn build_forest(
    dataset: &DataSet,
    expanded: &BooleanSet,
    selected: &BooleanSet,
    root_ids: &[String],
    depth: usize,
) -> Result<Vec<ViewNode>> {
    root_ids
        .iter()
        .map(|id| build_view(dataset, expanded, selected, id, depth))
        .collect()
}

/// Shape of a flattened row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Branch { expanded: bool, is_component: bool },
    Leaf,
}

/// One visible line of a flattened view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub selected: bool,
    pub kind: RowKind,
}

impl FlatRow {
    pub fn is_branch(&self) -> bool {
        matches!(self.kind, RowKind::Branch { .. })
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self.kind, RowKind::Branch { expanded: true, .. })
    }
}

#[derive(Default)]
struct RowCollector {
    rows: Vec<FlatRow>,
}

impl ViewVisitor for RowCollector {
    fn visit_branch(&mut self, branch: &BranchView) {
        self.rows.push(FlatRow {
            id: branch.id.clone(),
            name: branch.name.clone(),
            depth: branch.depth,
            selected: branch.selected,
            kind: RowKind::Branch {
                expanded: branch.expanded,
                is_component: branch.is_component,
            },
        });
    }

    fn visit_leaf(&mut self, leaf: &LeafView) {
        self.rows.push(FlatRow {
            id: leaf.id.clone(),
            name: leaf.name.clone(),
            depth: leaf.depth,
            selected: leaf.selected,
            kind: RowKind::Leaf,
        });
    }
}

/// Flatten views into display rows, depth-first.
pub fn flatten(nodes: &[ViewNode]) -> Vec<FlatRow> {
    let mut collector = RowCollector::default();
    for node in nodes {
        node.accept(&mut collector);
    }
    collector.rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavError;
    use crate::item::Item;
    use pretty_assertions::assert_eq;

    fn sample() -> DataSet {
        DataSet::from_iter([
            Item::new("button", "Button")
                .component()
                .with_children(["button--primary", "button--secondary"]),
            Item::new("button--primary", "Primary").with_parent("button"),
            Item::new("button--secondary", "Secondary").with_parent("button"),
            Item::new("forms", "Forms").with_children(["input", "button"]),
            Item::new("input", "Input").with_parent("forms"),
        ])
    }

    #[test]
    fn test_leaf_view() {
        let view = build_view(
            &sample(),
            &BooleanSet::new(),
            &BooleanSet::from_iter([("input", true)]),
            "input",
            3,
        )
        .unwrap();
        assert_eq!(
            view,
            ViewNode::Leaf(LeafView {
                id: "input".into(),
                name: "Input".into(),
                depth: 3,
                selected: true,
            })
        );
    }

    #[test]
    fn test_collapsed_branch_has_no_children() {
        let view = build_view(&sample(), &BooleanSet::new(), &BooleanSet::new(), "button", 0)
            .unwrap();
        match view {
            ViewNode::Branch(branch) => {
                assert!(!branch.expanded);
                assert!(branch.is_component);
                assert!(branch.children.is_empty());
            }
            other => panic!("expected a branch, got {other:?}"),
        }
    }

    #[test]
    fn test_expanded_branch_recurses_in_declaration_order() {
        let expanded = BooleanSet::from_iter([("forms", true), ("button", true)]);
        let selected = BooleanSet::from_iter([("button--secondary", true)]);
        let rows = flatten(&[build_view(&sample(), &expanded, &selected, "forms", 0).unwrap()]);

        let summary: Vec<(&str, usize, bool)> = rows
            .iter()
            .map(|row| (row.id.as_str(), row.depth, row.selected))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("forms", 0, false),
                ("input", 1, false),
                ("button", 1, false),
                ("button--primary", 2, false),
                ("button--secondary", 2, true),
            ]
        );
        assert!(rows[0].is_expanded());
        assert!(!rows[1].is_branch());
    }

    #[test]
    fn test_expansion_of_hidden_descendant_is_not_rendered() {
        // "button" is expanded but "forms" is collapsed, so nothing below forms shows.
        let expanded = BooleanSet::from_iter([("button", true)]);
        let rows = flatten(&[
            build_view(&sample(), &expanded, &BooleanSet::new(), "forms", 0).unwrap(),
        ]);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_build_view_is_deterministic() {
        let dataset = sample();
        let expanded = BooleanSet::from_iter([("forms", true), ("button", true)]);
        let selected = BooleanSet::from_iter([("input", true)]);
        let first = build_view(&dataset, &expanded, &selected, "forms", 0).unwrap();
        let second = build_view(&dataset, &expanded, &selected, "forms", 0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_root_fails() {
        let dataset = DataSet::from_iter([Item::new("A", "A").with_children(["B"])]);
        let err = build_view(&dataset, &BooleanSet::new(), &BooleanSet::new(), "B", 0)
            .unwrap_err();
        assert!(matches!(err, NavError::MissingItem(ref id) if id == "B"));
    }

    #[test]
    fn test_missing_child_fails_only_when_expanded() {
        let dataset = DataSet::from_iter([Item::new("A", "A").with_children(["B"])]);
        assert!(build_view(&dataset, &BooleanSet::new(), &BooleanSet::new(), "A", 0).is_ok());

        let expanded = BooleanSet::from_iter([("A", true)]);
        let err = build_view(&dataset, &expanded, &BooleanSet::new(), "A", 0).unwrap_err();
        assert!(matches!(err, NavError::MissingItem(ref id) if id == "B"));
    }

    #[test]
    fn test_build_forest_keeps_order() {
        let roots = vec!["input".to_string(), "button".to_string()];
        let views =
            build_forest(&sample(), &BooleanSet::new(), &BooleanSet::new(), &roots, 0).unwrap();
        let ids: Vec<&str> = views.iter().map(ViewNode::id).collect();
        assert_eq!(ids, vec!["input", "button"]);
    }

    #[test]
    fn test_href_by_kind() {
        let dataset = sample();
        let none = BooleanSet::new();
        let branch = build_view(&dataset, &none, &none, "button", 0).unwrap();
        let leaf = build_view(&dataset, &none, &none, "input", 0).unwrap();
        assert_eq!(branch.href(ViewMode::Story), "#button");
        assert_eq!(leaf.href(ViewMode::Docs), "?path=/docs/input");
    }
}
