use std::path::{Path, PathBuf};

use crate::models::{Manifest, NodeId, SourceTree};

impl Manifest {
    /// Absolute location of a node on disk.
    ///
    /// Walks up the parent index collecting `path` segments. Nodes without a
    /// path (label groups) contribute nothing. The main group ends the walk
    /// without contributing a segment; a `SOURCE_ROOT` node rebases onto
    /// `source_root` and an absolute node onto its own path.
    ///
    /// Returns `None` when the node is unknown, there is no main group, the
    /// chain never reaches the main group (including a chain that loops), or
    /// a node on it lives in a build-time source tree.
    pub fn full_path(&self, id: NodeId, source_root: &Path) -> Option<PathBuf> {
        let main_group = self.main_group()?;
        let mut segments: Vec<&str> = Vec::new();
        let mut current = id;
        let mut remaining = self.objects.len();

        let base = loop {
            remaining = remaining.checked_sub(1)?;
            let node = self.node(current)?;
            if current == main_group {
                break source_root.to_path_buf();
            }

            match node.source_tree {
                SourceTree::Group => {
                    if let Some(path) = node.path.as_deref() {
                        segments.push(path);
                    }
                    current = self.parent(current)?;
                }
                SourceTree::SourceRoot => {
                    let mut base = source_root.to_path_buf();
                    if let Some(path) = node.path.as_deref() {
                        base.push(path);
                    }
                    break base;
                }
                SourceTree::Absolute => break PathBuf::from(node.path.as_deref()?),
                SourceTree::BuildProductsDir | SourceTree::SdkRoot | SourceTree::DeveloperDir => {
                    return None
                }
            }
        };

        Some(segments.iter().rev().fold(base, |path, segment| path.join(segment)))
    }
}
