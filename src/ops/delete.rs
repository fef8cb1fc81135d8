use crate::error::TreeError;
use crate::tree::node::ComponentsTree;
use crate::tree::path::{children_mut, MenuPath};
use crate::tree::visit::collect_subtree_file_ids;
use crate::types::FileId;
use tracing::debug;

/// New tree plus every file id that lived under the removed node
#[derive(Debug, Clone)]
pub struct Deleted {
    pub tree: ComponentsTree,
    pub removed_file_ids: Vec<FileId>,
}

/// Remove the node at `path` with its whole subtree.
pub fn delete(tree: &ComponentsTree, path: &MenuPath) -> Result<Deleted, TreeError> {
    let (parent, key) = path.split_last()?;
    let mut next = tree.clone();
    let siblings = children_mut(&mut next, &parent)?;
    let removed = siblings
        .remove(key)
        .ok_or_else(|| TreeError::NodeNotFound(path.to_string()))?;

    let removed_file_ids = collect_subtree_file_ids(path, &removed);
    debug!(path = %path, files = removed_file_ids.len(), "Deleted option");
    Ok(Deleted {
        tree: next,
        removed_file_ids,
    })
}
