//! Click handling for branch and leaf rows.
//!
//! Both handlers are pure: they read the current Expanded store and return
//! the updated store plus an optional navigation target. Committing the
//! outcome is the job of the owning controller (see [`crate::session`]).

use std::fmt;
use std::str::FromStr;

use crate::error::NavError;
use crate::state::BooleanSet;

/// How the content view presents the active item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    #[default]
    Story,
    Docs,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Story => "story",
            ViewMode::Docs => "docs",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Story => ViewMode::Docs,
            ViewMode::Docs => ViewMode::Story,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "story" => Ok(ViewMode::Story),
            "docs" => Ok(ViewMode::Docs),
            _ => Err(NavError::UnknownViewMode(s.to_string())),
        }
    }
}

/// Receiver of "navigate to item" signals.
///
/// The navigation layer owns the active item and the view mode; it does not
/// own the Selected store, which it is expected to echo back into the
/// session once the target resolves.
pub trait Navigator {
    fn select_item(&mut self, id: &str);
}

/// Result of a click: the next Expanded store and an optional navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    pub expanded: BooleanSet,
    pub navigate_to: Option<String>,
}

/// Handle a click on a branch row.
///
/// Opening a collapsed component branch also navigates to its first child.
/// The expansion toggle happens regardless.
pub fn on_branch_click(
    id: &str,
    is_component: bool,
    child_ids: &[String],
    expanded: &BooleanSet,
) -> ClickOutcome {
    let navigate_to = if !expanded.get(id) && is_component {
        child_ids.first().cloned()
    } else {
        None
    };
    ClickOutcome {
        expanded: expanded.toggled(id),
        navigate_to,
    }
}

/// Handle a click on a leaf row: always navigate, and flip the leaf's own
/// expansion bit like a branch would.
pub fn on_leaf_click(id: &str, expanded: &BooleanSet) -> ClickOutcome {
    ClickOutcome {
        expanded: expanded.toggled(id),
        navigate_to: Some(id.to_string()),
    }
}
