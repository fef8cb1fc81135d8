use crate::error::TreeError;
use crate::tree::node::{ComponentsTree, OptionNode, Selection};
use crate::tree::path::{resolve_mut, MenuPath};

/// Set the active option of the attribute at `path`.
///
/// A named selection must be one of the attribute's option keys.
pub fn select_option(
    tree: &ComponentsTree,
    path: &MenuPath,
    selection: Selection,
) -> Result<ComponentsTree, TreeError> {
    let mut next = tree.clone();
    let attr = match resolve_mut(&mut next, path)? {
        OptionNode::Parent(attr) => attr,
        OptionNode::Leaf(_) => return Err(TreeError::NotAContainer(path.to_string())),
    };
    if let Selection::Option(name) = &selection {
        if !attr.options.contains_key(name) {
            return Err(TreeError::UnknownOption {
                path: path.to_string(),
                option: name.clone(),
            });
        }
    }
    attr.selected_option = selection;
    Ok(next)
}
