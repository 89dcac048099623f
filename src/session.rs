//! Single owner of one collection's Expanded and Selected stores.

use tracing::debug;

use crate::error::Result;
use crate::interaction::{on_branch_click, on_leaf_click, ClickOutcome, Navigator};
use crate::item::DataSet;
use crate::state::BooleanSet;
use crate::tree::{build_view, ViewNode};

/// Navigation state for one sidebar session. Created fresh per mount and
/// never persisted.
#[derive(Debug, Clone, Default)]
pub struct NavSession {
    expanded: BooleanSet,
    selected: BooleanSet,
}

impl NavSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with `id` selected and every ancestor of it expanded.
    pub fn revealing(dataset: &DataSet, id: &str) -> Self {
        let mut session = Self::new();
        for ancestor in dataset.ancestors(id) {
            session.expanded.set(ancestor, true);
        }
        session.selected.set(id, true);
        session
    }

    pub fn expanded(&self) -> &BooleanSet {
        &self.expanded
    }

    pub fn selected(&self) -> &BooleanSet {
        &self.selected
    }

    pub fn view(&self, dataset: &DataSet, root_id: &str, depth: usize) -> Result<ViewNode> {
        build_view(dataset, &self.expanded, &self.selected, root_id, depth)
    }

    /// Route a click on `id` through the branch or leaf protocol and commit it.
    ///
    /// Returns the navigation target, if any was signalled.
    pub fn click<N: Navigator + ?Sized>(
        &mut self,
        dataset: &DataSet,
        id: &str,
        navigator: &mut N,
    ) -> Result<Option<String>> {
        let item = dataset.require(id)?;
        let outcome = if item.has_children() {
            on_branch_click(&item.id, item.is_component, &item.child_ids, &self.expanded)
        } else {
            on_leaf_click(&item.id, &self.expanded)
        };
        debug!(
            id,
            branch = item.has_children(),
            navigate_to = ?outcome.navigate_to,
            "sidebar click"
        );
        Ok(self.commit(outcome, navigator))
    }

    /// Apply a click outcome: signal navigation first, then store the new
    /// expansion state.
    pub fn commit<N: Navigator + ?Sized>(
        &mut self,
        outcome: ClickOutcome,
        navigator: &mut N,
    ) -> Option<String> {
        if let Some(target) = &outcome.navigate_to {
            navigator.select_item(target);
        }
        self.expanded = outcome.expanded;
        outcome.navigate_to
    }

    /// Echo the navigation layer's active item into the Selected store.
    pub fn sync_selection(&mut self, active: Option<&str>) {
        self.selected.clear();
        if let Some(id) = active {
            self.selected.set(id, true);
        }
    }
}
