//! Structural edits on the navigator tree.
//!
//! These are the low-level insertion primitives: they keep the arena, the
//! groups' child lists and the parent index in step, and know nothing about
//! the filesystem beyond resolving paths. Field alignment for the consuming
//! toolchain is applied one layer up, in [`crate::project`].

mod paths;
pub mod render;

use std::path::Path;

use crate::error::{CandyError, Result};
use crate::models::{Manifest, Node, NodeId, NodeKind, SourceTree};

/// Options for [`Manifest::add_group_chain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupOptions {
    /// Create label-only groups (`name` set, `path` unset) that do not map to
    /// a folder on disk.
    pub without_folder: bool,
}

impl GroupOptions {
    pub fn without_folder() -> Self {
        Self {
            without_folder: true,
        }
    }
}

impl Manifest {
    /// Append `node` under `parent`, which must be a group.
    pub fn insert_node(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        match self.node(parent) {
            Some(group) if group.is_group() => Ok(self.push_child(parent, node)),
            _ => Err(CandyError::not_found(format!("group {parent}"))),
        }
    }

    /// Arena insert plus child/parent links. `parent` is expected to be a group.
    pub(crate) fn push_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = node.id;
        if let Some(Node {
            kind: NodeKind::Group { children },
            ..
        }) = self.objects.get_mut(&parent)
        {
            children.push(id);
            self.parents.insert(id, parent);
        }
        self.objects.insert(id, node);
        id
    }

    /// The first child group of `parent` that `segment` would be inserted as.
    ///
    /// Folder groups match on `path` only, so a reused group always maps the
    /// folder `segment` on disk. Label groups match a pathless group by name.
    pub fn child_group(
        &self,
        parent: NodeId,
        segment: &str,
        options: GroupOptions,
    ) -> Option<NodeId> {
        self.node(parent)?.children().iter().copied().find(|id| {
            self.node(*id).is_some_and(|child| {
                child.is_group()
                    && if options.without_folder {
                        child.is_label_for(segment)
                    } else {
                        child.is_folder_for(segment)
                    }
            })
        })
    }

    /// Follow a `/`-separated chain of group segments down from `parent`.
    ///
    /// Each segment resolves to a folder group if there is one, otherwise to
    /// a label group of that name.
    pub fn find_group(&self, parent: NodeId, group_path: &str) -> Option<NodeId> {
        group_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(parent, |current, segment| {
                self.child_group(current, segment, GroupOptions::default())
                    .or_else(|| self.child_group(current, segment, GroupOptions::without_folder()))
            })
    }

    /// Create the chain of groups named by `group_path` under `parent`.
    ///
    /// Each `/`-separated segment becomes one group. Segments that already
    /// exist as child groups of the same kind are reused (see
    /// [`Manifest::child_group`]), so only the groups actually created
    /// are returned; the list is empty when the whole chain already exists.
    /// New groups carry the segment as their name, and also as their path
    /// unless `options.without_folder` is set.
    pub fn add_group_chain(
        &mut self,
        parent: NodeId,
        group_path: &str,
        options: GroupOptions,
    ) -> Result<Vec<NodeId>> {
        if !self.node(parent).is_some_and(Node::is_group) {
            return Err(CandyError::not_found(format!("group {parent}")));
        }

        let mut current = parent;
        let mut created = Vec::new();
        for segment in group_path.split('/').filter(|segment| !segment.is_empty()) {
            if let Some(existing) = self.child_group(current, segment, options) {
                current = existing;
                continue;
            }

            let path = (!options.without_folder).then(|| segment.to_string());
            current = self.push_child(current, Node::group(Some(segment.to_string()), path));
            created.push(current);
        }

        Ok(created)
    }

    /// Reference the existing file at `file_path` from `group`.
    ///
    /// If the group already has a file reference resolving to `file_path`,
    /// that reference is returned unchanged. Otherwise the new reference is
    /// group-relative when the file lives below the group's folder and
    /// absolute when it does not.
    pub fn add_file_reference(
        &mut self,
        group: NodeId,
        file_path: &Path,
        source_root: &Path,
    ) -> Result<NodeId> {
        if !self.node(group).is_some_and(Node::is_group) {
            return Err(CandyError::not_found(format!("group {group}")));
        }
        if !file_path.is_file() {
            return Err(CandyError::not_found(format!(
                "file at {}",
                file_path.display()
            )));
        }

        let group_path = self
            .full_path(group, source_root)
            .ok_or_else(|| CandyError::not_found(format!("fullPath for group {group}")))?;

        let existing = self.node(group).and_then(|node| {
            node.children().iter().copied().find(|child| {
                self.node(*child).is_some_and(Node::is_file_reference)
                    && self.full_path(*child, source_root).as_deref() == Some(file_path)
            })
        });
        if let Some(existing) = existing {
            return Ok(existing);
        }

        let name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let (source_tree, path) = match file_path.strip_prefix(&group_path) {
            Ok(relative) => (SourceTree::Group, relative.to_string_lossy().into_owned()),
            Err(_) => (
                SourceTree::Absolute,
                file_path.to_string_lossy().into_owned(),
            ),
        };

        Ok(self.push_child(group, Node::file_reference(name, path, source_tree)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_group(manifest: &Manifest) -> NodeId {
        let main_group = manifest.main_group().unwrap();
        manifest
            .child_group(main_group, "App", GroupOptions::default())
            .unwrap()
    }

    #[test]
    fn test_add_group_chain_creates_each_segment() {
        let mut manifest = Manifest::new_application("App");
        let parent = source_group(&manifest);

        let created = manifest
            .add_group_chain(parent, "A/B/C", GroupOptions::default())
            .unwrap();

        assert_eq!(created.len(), 3);
        assert_eq!(manifest.parent(created[0]), Some(parent));
        assert_eq!(manifest.parent(created[1]), Some(created[0]));
        assert_eq!(manifest.parent(created[2]), Some(created[1]));
        let leaf = manifest.node(created[2]).unwrap();
        assert_eq!(leaf.name.as_deref(), Some("C"));
        assert_eq!(leaf.path.as_deref(), Some("C"));
    }

    #[test]
    fn test_add_group_chain_reuses_existing_segments() {
        let mut manifest = Manifest::new_application("App");
        let parent = source_group(&manifest);

        let first = manifest
            .add_group_chain(parent, "A/B", GroupOptions::default())
            .unwrap();
        let second = manifest
            .add_group_chain(parent, "A/B/C", GroupOptions::default())
            .unwrap();
        let third = manifest
            .add_group_chain(parent, "A/B/C", GroupOptions::default())
            .unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert!(third.is_empty());
        assert_eq!(manifest.find_group(parent, "A/B/C"), Some(second[0]));
    }

    #[test]
    fn test_add_group_chain_without_folder_has_no_path() {
        let mut manifest = Manifest::new_application("App");
        let parent = source_group(&manifest);

        let created = manifest
            .add_group_chain(parent, "Label", GroupOptions::without_folder())
            .unwrap();

        let group = manifest.node(created[0]).unwrap();
        assert_eq!(group.name.as_deref(), Some("Label"));
        assert!(group.path.is_none());
    }

    #[test]
    fn test_add_group_chain_keeps_folders_and_labels_apart() {
        let mut manifest = Manifest::new_application("App");
        let parent = source_group(&manifest);

        let label = manifest
            .add_group_chain(parent, "Shared", GroupOptions::without_folder())
            .unwrap();
        let folder = manifest
            .add_group_chain(parent, "Shared", GroupOptions::default())
            .unwrap();

        assert_eq!(label.len(), 1);
        assert_eq!(folder.len(), 1);
        assert_ne!(label[0], folder[0]);
        assert_eq!(manifest.node(folder[0]).unwrap().path.as_deref(), Some("Shared"));
        assert_eq!(manifest.find_group(parent, "Shared"), Some(folder[0]));
        assert_eq!(
            manifest.child_group(parent, "Shared", GroupOptions::without_folder()),
            Some(label[0])
        );
    }

    #[test]
    fn test_add_group_chain_ignores_renamed_group_label() {
        let mut manifest = Manifest::new_application("App");
        let parent = source_group(&manifest);
        let renamed = manifest
            .insert_node(parent, Node::group(Some("Foo".into()), Some("Bar".into())))
            .unwrap();

        let created = manifest
            .add_group_chain(parent, "Foo", GroupOptions::default())
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_ne!(created[0], renamed);

        let reused = manifest
            .add_group_chain(parent, "Bar", GroupOptions::default())
            .unwrap();
        assert!(reused.is_empty());
    }

    #[test]
    fn test_add_group_chain_ignores_empty_segments() {
        let mut manifest = Manifest::new_application("App");
        let parent = source_group(&manifest);

        let created = manifest
            .add_group_chain(parent, "/A//B/", GroupOptions::default())
            .unwrap();

        assert_eq!(created.len(), 2);
    }

    #[test]
    fn test_insert_node_rejects_non_group_parent() {
        let mut manifest = Manifest::new_application("App");
        let parent = source_group(&manifest);
        let file = manifest
            .insert_node(
                parent,
                Node::file_reference(None, "main.swift".into(), SourceTree::Group),
            )
            .unwrap();

        let result = manifest.insert_node(file, Node::group(None, Some("X".into())));
        assert!(matches!(result, Err(CandyError::NotFound { .. })));
    }
}
