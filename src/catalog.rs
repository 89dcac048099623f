//! Catalog files: the main collection plus any composed refs.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::auth::AuthGate;
use crate::error::{NavError, Result};
use crate::item::{DataSet, Item};
use crate::placeholder::Placeholder;
use crate::roots::{partition_roots, Partition};
use crate::session::NavSession;

/// Id of the ref that holds the catalog's own items.
pub const MAIN_REF_ID: &str = "main";

const DEFAULT_TITLE: &str = "Catalog";

/// On-disk catalog layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFile {
    #[serde(default)]
    pub title: Option<String>,
    /// Top-level ids; defaults to parentless items in file order.
    #[serde(default)]
    pub roots: Option<Vec<String>>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub refs: Vec<RefFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefFile {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub source: RefSource,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RefSource {
    Loading,
    Error {
        message: String,
    },
    Auth {
        #[serde(rename = "authUrl")]
        auth_url: String,
    },
    Ready {
        #[serde(default)]
        roots: Option<Vec<String>>,
        #[serde(default)]
        items: Vec<Item>,
    },
}

/// A validated dataset together with its declared top-level ids.
#[derive(Debug, Clone)]
pub struct Collection {
    dataset: DataSet,
    root_ids: Vec<String>,
}

impl Collection {
    pub fn new(dataset: DataSet, root_ids: Vec<String>) -> Result<Self> {
        dataset.validate(&root_ids)?;
        Ok(Self { dataset, root_ids })
    }

    /// Build from items in file order, deriving roots when none are given.
    pub fn from_items(items: Vec<Item>, roots: Option<Vec<String>>) -> Result<Self> {
        let root_ids = roots.unwrap_or_else(|| {
            items
                .iter()
                .filter(|item| item.parent_id.is_none())
                .map(|item| item.id.clone())
                .collect()
        });
        Self::new(DataSet::try_from_items(items)?, root_ids)
    }

    pub fn dataset(&self) -> &DataSet {
        &self.dataset
    }

    pub fn root_ids(&self) -> &[String] {
        &self.root_ids
    }

    pub fn partition(&self) -> Result<Partition> {
        partition_roots(&self.dataset, &self.root_ids)
    }
}

#[derive(Debug)]
pub enum RefState {
    Loading,
    Error(String),
    Auth(AuthGate),
    Ready(Collection),
}

/// One collection shown in the sidebar, with its own navigation session.
#[derive(Debug)]
pub struct Ref {
    pub id: String,
    pub title: String,
    pub is_main: bool,
    pub state: RefState,
    pub session: NavSession,
}

impl Ref {
    pub fn new(id: impl Into<String>, title: impl Into<String>, state: RefState) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_main: false,
            state,
            session: NavSession::new(),
        }
    }

    pub fn main(title: impl Into<String>, collection: Collection) -> Self {
        let mut main = Self::new(MAIN_REF_ID, title, RefState::Ready(collection));
        main.is_main = true;
        main
    }

    fn from_file(file: RefFile) -> Self {
        let state = match file.source {
            RefSource::Loading => RefState::Loading,
            RefSource::Error { message } => RefState::Error(message),
            RefSource::Auth { auth_url } => RefState::Auth(AuthGate::new(auth_url, file.id.clone())),
            RefSource::Ready { roots, items } => match Collection::from_items(items, roots) {
                Ok(collection) => RefState::Ready(collection),
                Err(e) => {
                    warn!(ref_id = %file.id, error = %e, "ref failed validation");
                    RefState::Error(e.to_string())
                }
            },
        };
        Self::new(file.id, file.title, state)
    }

    pub fn collection(&self) -> Option<&Collection> {
        match &self.state {
            RefState::Ready(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        match &self.state {
            RefState::Loading => Some(Placeholder::loading(self.is_main)),
            RefState::Error(description) => Some(Placeholder::error(description)),
            RefState::Auth(_) | RefState::Ready(_) => None,
        }
    }

    /// Id of an item of this ref as the navigation layer addresses it.
    pub fn qualified_id(&self, item_id: &str) -> String {
        if self.is_main {
            item_id.to_string()
        } else {
            format!("{}_{}", self.id, item_id)
        }
    }
}

/// Everything the sidebar renders: the main collection first, then refs.
#[derive(Debug)]
pub struct Catalog {
    pub title: String,
    pub refs: Vec<Ref>,
}

impl Catalog {
    /// Build a catalog. The main collection must be valid; refs that fail
    /// validation are kept in the error state. A ref whose id is already
    /// taken is kept in the error state too, so auth sessions and qualified
    /// ids stay unique.
    pub fn from_file(file: CatalogFile) -> Result<Self> {
        let title = file.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let main = Ref::main(title.clone(), Collection::from_items(file.items, file.roots)?);
        let mut seen: HashSet<String> = HashSet::from([MAIN_REF_ID.to_string()]);
        let mut refs = vec![main];
        for ref_file in file.refs {
            if !seen.insert(ref_file.id.clone()) {
                let err = NavError::DuplicateRef(ref_file.id.clone());
                warn!(ref_id = %ref_file.id, "duplicate ref id");
                refs.push(Ref::new(ref_file.id, ref_file.title, RefState::Error(err.to_string())));
                continue;
            }
            refs.push(Ref::from_file(ref_file));
        }
        Ok(Self { title, refs })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Select `item_id` in the main collection and expand its ancestors.
    /// Returns false when the main collection has no such item.
    pub fn reveal(&mut self, item_id: &str) -> bool {
        let Some(main) = self.refs.iter_mut().find(|r| r.is_main) else {
            return false;
        };
        let session = match &main.state {
            RefState::Ready(collection) if collection.dataset().contains(item_id) => {
                NavSession::revealing(collection.dataset(), item_id)
            }
            _ => return false,
        };
        main.session = session;
        true
    }
}
