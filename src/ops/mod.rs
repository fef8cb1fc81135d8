//! Pure mutation operations on component trees
//!
//! Every operation takes the tree by reference, works on a clone and returns
//! the new value. The input tree is never modified, so prior snapshots held
//! by the undo history stay intact. On error no new tree is produced.

mod add;
mod delete;
mod rename;
mod select;
mod update;

pub use add::{add_leaf, add_parent, LeafAdded};
pub use delete::{delete, Deleted};
pub use rename::rename;
pub use select::select_option;
pub use update::{update_leaf, LeafUpdated};

use crate::category::checked_name;
use crate::error::TreeError;
use crate::tree::node::{OptionNode, DISABLED_SELECTION};
use std::collections::BTreeMap;

/// Reject blank names, the reserved disabled marker and names already used
/// by a sibling (exact match).
fn ensure_free_name(siblings: &BTreeMap<String, OptionNode>, name: &str) -> Result<(), TreeError> {
    let name = checked_name(name)?;
    if name == DISABLED_SELECTION {
        return Err(TreeError::InvalidName(name.to_string()));
    }
    if siblings.contains_key(name) {
        return Err(TreeError::DuplicateName(name.to_string()));
    }
    Ok(())
}
