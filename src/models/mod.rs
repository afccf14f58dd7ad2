//! Domain models for the project manifest.
//!
//! # Core Concepts
//!
//! - [`Node`]: An element of the navigator tree, either a group or a file
//!   reference. Groups may map to a folder on disk (`path` set) or be a pure
//!   label (`name` only).
//! - [`Target`]: A buildable product with ordered [`BuildPhase`]s, each listing
//!   its member files as [`BuildFile`]s.
//! - [`RootObject`]: Names the main group, the entry point of the tree.
//! - [`Manifest`]: The object arena plus targets; the unit that is loaded and
//!   written back.

mod manifest;
mod node;
mod target;

pub use manifest::*;
pub use node::*;
pub use target::*;
