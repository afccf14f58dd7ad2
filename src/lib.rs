//! Editing of Xcode-style project manifests.
//!
//! Open a project with [`Candy::open`], add groups and files under its source
//! group (creating the matching folders and files on disk), register files in
//! the main target's sources phase, then [`Candy::write`] the manifest back.

pub mod config;
pub mod error;
pub mod models;
pub mod project;
pub mod store;
pub mod tree;

pub use config::{CandyConfig, FileWritePolicy};
pub use error::{CandyError, Result};
pub use project::Candy;
pub use tree::GroupOptions;
