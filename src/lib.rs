//! Navigation-tree state for a hierarchical sidebar.
//!
//! The core is an in-process library: items and datasets ([`item`]), the
//! Expanded/Selected stores ([`state`]), traversal into a view structure
//! ([`tree`]), the click protocol ([`interaction`]) and its single-writer
//! controller ([`session`]), root partitioning ([`roots`]), the auth gate
//! ([`auth`]), and placeholder states ([`placeholder`]). [`catalog`] loads
//! all of it from a JSON file.

pub mod auth;
pub mod catalog;
pub mod error;
pub mod interaction;
pub mod item;
pub mod placeholder;
pub mod roots;
pub mod session;
pub mod state;
pub mod tree;

pub use error::{NavError, Result};
