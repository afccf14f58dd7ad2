use std::fs;

use super::Candy;
use crate::config::FileWritePolicy;
use crate::error::Result;
use crate::models::{NodeId, NodeKind};
use crate::store::ManifestStore;
use crate::tree::GroupOptions;

impl<S: ManifestStore> Candy<S> {
    /// Add the group chain `name` under the primary source group.
    pub fn add_group(&mut self, name: &str, options: GroupOptions) -> Result<Vec<NodeId>> {
        let source_group = self.source_group()?;
        self.add_group_in(source_group, name, options)
    }

    /// Add the group chain `name` (`/`-separated) under `parent`.
    ///
    /// The folder `<parent path>/<name>` is created first if it is not already
    /// a directory. Returns only the groups that were created; segments that
    /// already existed are reused. Folder-backed groups come back with `path`
    /// set and `name` cleared, which is how the toolchain itself records them;
    /// `without_folder` groups keep their name and have no path.
    pub fn add_group_in(
        &mut self,
        parent: NodeId,
        name: &str,
        options: GroupOptions,
    ) -> Result<Vec<NodeId>> {
        let group_dir = self.full_path(parent)?.join(name);
        if !group_dir.is_dir() {
            tracing::info!("Creating group directory {}", group_dir.display());
            fs::create_dir_all(&group_dir)?;
        }

        let new_groups = self.manifest.add_group_chain(parent, name, options)?;
        tracing::debug!("Created {} group(s) for {}", new_groups.len(), name);

        if !options.without_folder {
            for id in &new_groups {
                if let Some(group) = self.manifest.node_mut(*id) {
                    group.name = None;
                }
            }
        }

        Ok(new_groups)
    }

    /// Write `contents` to `<group path>/<file_name>` and reference the file
    /// from `group`.
    ///
    /// `None` contents produce an empty file. An existing file is replaced
    /// unless the configured [`FileWritePolicy`] is `KeepExisting`. The
    /// returned reference has no name and no explicit file type, and its path
    /// is the bare `file_name`, matching entries added through the
    /// toolchain's UI.
    pub fn add_file(
        &mut self,
        group: NodeId,
        file_name: &str,
        contents: Option<&[u8]>,
    ) -> Result<NodeId> {
        let file_path = self.full_path(group)?.join(file_name);

        if self.config.file_write_policy == FileWritePolicy::KeepExisting && file_path.exists() {
            tracing::warn!("Keeping existing file {}", file_path.display());
        } else {
            tracing::info!("Writing file {}", file_path.display());
            fs::write(&file_path, contents.unwrap_or_default())?;
        }

        let file = self
            .manifest
            .add_file_reference(group, &file_path, &self.project_root)?;

        if let Some(node) = self.manifest.node_mut(file) {
            if let NodeKind::FileReference {
                explicit_file_type, ..
            } = &mut node.kind
            {
                *explicit_file_type = None;
            }
            node.name = None;
            node.path = Some(file_name.to_string());
        }

        Ok(file)
    }
}
