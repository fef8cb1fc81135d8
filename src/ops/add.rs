use super::ensure_free_name;
use crate::error::TreeError;
use crate::ids::IdMinter;
use crate::tree::node::{ComponentsTree, OptionNode};
use crate::tree::path::{children_mut, MenuPath};
use crate::types::{FileId, PageId};
use crate::upload::{check_upload_complete, FileSet};
use tracing::debug;

/// New tree plus the pending id minted for the leaf's file set
#[derive(Debug, Clone)]
pub struct LeafAdded {
    pub tree: ComponentsTree,
    pub file_id: FileId,
}

/// Insert a file leaf named `name` under the container at `parent`.
///
/// `files` must hold exactly one blob per selected page.
pub fn add_leaf(
    tree: &ComponentsTree,
    parent: &MenuPath,
    name: &str,
    selected_pages: &[PageId],
    files: &FileSet,
    minter: &dyn IdMinter,
) -> Result<LeafAdded, TreeError> {
    let mut next = tree.clone();
    let siblings = children_mut(&mut next, parent)?;
    ensure_free_name(siblings, name)?;
    check_upload_complete(selected_pages, files)?;

    let file_id = minter.mint();
    siblings.insert(name.to_string(), OptionNode::leaf(file_id.clone()));
    debug!(parent = %parent, name, file_id = %file_id, "Added leaf option");
    Ok(LeafAdded {
        tree: next,
        file_id,
    })
}

/// Insert an empty nested attribute named `name` under `parent`.
pub fn add_parent(
    tree: &ComponentsTree,
    parent: &MenuPath,
    name: &str,
) -> Result<ComponentsTree, TreeError> {
    let mut next = tree.clone();
    let siblings = children_mut(&mut next, parent)?;
    ensure_free_name(siblings, name)?;

    siblings.insert(name.to_string(), OptionNode::parent());
    debug!(parent = %parent, name, "Added parent option");
    Ok(next)
}
