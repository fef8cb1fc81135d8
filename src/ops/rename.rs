use super::ensure_free_name;
use crate::error::TreeError;
use crate::tree::node::{ComponentsTree, OptionNode};
use crate::tree::path::{children_mut, MenuPath};
use tracing::{debug, warn};

/// Rename the node at `path` to `new_name`, keeping its subtree.
///
/// This is a pure key substitution: an ancestor whose `selectedOption` named
/// the old key keeps pointing at it.
pub fn rename(
    tree: &ComponentsTree,
    path: &MenuPath,
    new_name: &str,
) -> Result<ComponentsTree, TreeError> {
    let (parent, old_name) = path.split_last()?;
    let mut next = tree.clone();
    let siblings = children_mut(&mut next, &parent)?;
    if !siblings.contains_key(old_name) {
        return Err(TreeError::NodeNotFound(path.to_string()));
    }
    if old_name == new_name {
        return Ok(next);
    }
    ensure_free_name(siblings, new_name)?;

    if let Some(node) = siblings.remove(old_name) {
        siblings.insert(new_name.to_string(), node);
    }

    if let Some(OptionNode::Parent(attr)) = parent_node(&next, &parent) {
        if attr.selected_option.option() == Some(old_name) {
            warn!(
                path = %path,
                new_name,
                "Renamed option is still selected by its parent under the old name"
            );
        }
    }
    debug!(path = %path, new_name, "Renamed option");
    Ok(next)
}

fn parent_node<'a>(tree: &'a ComponentsTree, parent: &MenuPath) -> Option<&'a OptionNode> {
    if parent.is_root() {
        None
    } else {
        crate::tree::path::resolve(tree, parent).ok()
    }
}
