//! ASCII tree rendering for the project navigator.

use std::collections::HashSet;

use crate::models::{Manifest, Node, NodeId};

const FOLDER: char = '▸';
const LABEL: char = '◇';
const FILE: char = '•';

/// Get the symbol for a node.
///
/// Folder-backed groups and label-only groups are drawn differently so that
/// alignment problems (a group that should map to a folder but has no path)
/// stand out.
fn node_symbol(node: &Node) -> char {
    if !node.is_group() {
        FILE
    } else if node.path.is_some() {
        FOLDER
    } else {
        LABEL
    }
}

/// Render the subtree rooted at `root` as ASCII art.
///
/// Example output:
/// ```text
/// Demo
/// ├── ▸ Demo
/// │   ├── • AppDelegate.swift
/// │   └── ▸ Views
/// ├── ▸ DemoTests
/// └── ◇ Products
/// ```
pub fn render_tree(manifest: &Manifest, root: NodeId, title: &str) -> String {
    let mut output = String::new();
    output.push_str(title);
    output.push('\n');

    if let Some(node) = manifest.node(root) {
        let mut visited = HashSet::from([root]);
        render_children(&mut output, manifest, node.children(), "", &mut visited);
    }
    output
}

/// Recursively render a list of siblings and their children.
///
/// A node already drawn is not descended into again, so child lists that
/// loop back up the tree still terminate.
fn render_children(
    output: &mut String,
    manifest: &Manifest,
    children: &[NodeId],
    prefix: &str,
    visited: &mut HashSet<NodeId>,
) {
    for (i, id) in children.iter().enumerate() {
        let Some(node) = manifest.node(*id) else {
            continue;
        };
        let first_visit = visited.insert(*id);
        let is_last = i == children.len() - 1;

        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        output.push(node_symbol(node));
        output.push(' ');
        output.push_str(node.display_name().unwrap_or("?"));
        output.push('\n');

        if !first_visit {
            continue;
        }
        let continuation = if is_last { "    " } else { "│   " };
        let child_prefix = format!("{}{}", prefix, continuation);
        render_children(output, manifest, node.children(), &child_prefix, visited);
    }
}
