//! Splitting the declared top-level ids into headed groups and the rest.

use crate::error::Result;
use crate::item::DataSet;

/// A root rendered under its own heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootGroup {
    pub id: String,
    pub name: String,
    /// Top-level ids rendered under the heading.
    pub children: Vec<String>,
}

/// Top-level ids split by whether they carry a group name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Ungrouped roots, rendered together without a heading.
    pub others: Vec<String>,
    pub roots: Vec<RootGroup>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.others.len() + self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.others.is_empty() && self.roots.is_empty()
    }
}

/// Partition `root_ids`, keeping declaration order within each side.
pub fn partition_roots(dataset: &DataSet, root_ids: &[String]) -> Result<Partition> {
    let mut partition = Partition::default();
    for id in root_ids {
        let item = dataset.require(id)?;
        match item.group_name() {
            Some(name) => partition.roots.push(RootGroup {
                id: item.id.clone(),
                name: name.to_string(),
                children: item.child_ids.clone(),
            }),
            None => partition.others.push(item.id.clone()),
        }
    }
    Ok(partition)
}
