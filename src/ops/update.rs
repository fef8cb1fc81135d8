use crate::error::TreeError;
use crate::tree::node::{ComponentsTree, OptionNode};
use crate::tree::path::{resolve_mut, MenuPath};
use crate::types::FileId;
use tracing::debug;

/// New tree plus the file id the leaf referenced before the swap
#[derive(Debug, Clone)]
pub struct LeafUpdated {
    pub tree: ComponentsTree,
    pub previous_file_id: FileId,
}

/// Swap the file reference of the leaf at `path`. Structure is unchanged.
pub fn update_leaf(
    tree: &ComponentsTree,
    path: &MenuPath,
    new_file_id: FileId,
) -> Result<LeafUpdated, TreeError> {
    let mut next = tree.clone();
    let previous_file_id = match resolve_mut(&mut next, path)? {
        OptionNode::Leaf(file) => std::mem::replace(&mut file.file_id, new_file_id),
        OptionNode::Parent(_) => return Err(TreeError::NotALeaf(path.to_string())),
    };
    debug!(path = %path, previous = %previous_file_id, "Swapped leaf file");
    Ok(LeafUpdated {
        tree: next,
        previous_file_id,
    })
}
