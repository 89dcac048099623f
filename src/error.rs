use thiserror::Error;

/// Errors raised by the navigation core.
///
/// Dataset-integrity variants are caller bugs: the core reports them and
/// never tries to repair the dataset.
#[derive(Debug, Error)]
pub enum NavError {
    /// A root or child id is not a key of the dataset.
    #[error("item `{0}` is not present in the dataset")]
    MissingItem(String),
    #[error("item id `{0}` is declared more than once")]
    DuplicateItem(String),
    #[error("item `{0}` lists itself as a child")]
    SelfReference(String),
    #[error("item `{parent}` lists child `{child}` more than once")]
    DuplicateChild { parent: String, child: String },
    #[error("item `{parent}` references unknown child `{child}`")]
    DanglingChild { parent: String, child: String },
    /// Traversal from a declared root revisits an id already on the path.
    #[error("item `{0}` is reachable from itself")]
    Cycle(String),
    #[error("ref id `{0}` is already used by another collection")]
    DuplicateRef(String),
    #[error("unknown view mode `{0}` (expected `story` or `docs`)")]
    UnknownViewMode(String),
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = NavError> = std::result::Result<T, E>;
