//! Terminal display states shown in place of a collection's tree.

use std::fmt;

/// How much skeleton to show while a collection loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderSize {
    Single,
    Multiple,
}

impl LoaderSize {
    /// The main collection gets the larger skeleton.
    pub fn for_collection(is_main: bool) -> Self {
        if is_main {
            LoaderSize::Multiple
        } else {
            LoaderSize::Single
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    Loading(LoaderSize),
    /// A pre-formatted description; no retry at this layer.
    Error { description: String },
}

impl Placeholder {
    pub fn loading(is_main: bool) -> Self {
        Placeholder::Loading(LoaderSize::for_collection(is_main))
    }

    pub fn error(error: impl fmt::Display) -> Self {
        Placeholder::Error {
            description: error.to_string(),
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Placeholder::Loading(_) => "Loading…",
            Placeholder::Error { .. } => "Something went wrong",
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Placeholder::Loading(_) => None,
            Placeholder::Error { description } => Some(description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_size_follows_main_flag() {
        assert_eq!(Placeholder::loading(true), Placeholder::Loading(LoaderSize::Multiple));
        assert_eq!(Placeholder::loading(false), Placeholder::Loading(LoaderSize::Single));
    }

    #[test]
    fn test_error_keeps_description() {
        let placeholder = Placeholder::error("HTTP 500: upstream unavailable");
        assert_eq!(
            placeholder.description(),
            Some("HTTP 500: upstream unavailable")
        );
        assert_eq!(Placeholder::loading(true).description(), None);
    }
}
