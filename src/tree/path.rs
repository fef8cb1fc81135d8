//! Path resolution over component trees
//!
//! A location is the ordered chain of keys from the tree root (`menuOf`):
//! the first key indexes the top-level map, every following key steps into
//! the current node's `options`.

use crate::error::TreeError;
use crate::tree::node::{ComponentsTree, OptionNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Location descriptor: keys from root to the addressed node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuPath(Vec<String>);

impl MenuPath {
    /// The root location (addresses the top-level map)
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Last key of the path
    pub fn leaf_key(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Location of the parent container; `None` at the root
    pub fn parent(&self) -> Option<MenuPath> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Path extended by one key
    pub fn child(&self, key: impl Into<String>) -> MenuPath {
        let mut keys = self.0.clone();
        keys.push(key.into());
        Self(keys)
    }

    /// Split into (parent location, last key)
    pub fn split_last(&self) -> Result<(MenuPath, &str), TreeError> {
        match self.0.split_last() {
            Some((last, rest)) => Ok((Self(rest.to_vec()), last.as_str())),
            None => Err(TreeError::EmptyLocation),
        }
    }
}

impl fmt::Display for MenuPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "/")
        } else {
            write!(f, "{}", self.0.join("/"))
        }
    }
}

impl<S: Into<String>> FromIterator<S> for MenuPath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

fn not_found(path: &MenuPath, depth: usize) -> TreeError {
    TreeError::NodeNotFound(MenuPath::new(path.keys()[..=depth].iter().cloned()).to_string())
}

/// Resolve the node at `path`.
pub fn resolve<'a>(tree: &'a ComponentsTree, path: &MenuPath) -> Result<&'a OptionNode, TreeError> {
    let (first, rest) = path.keys().split_first().ok_or(TreeError::EmptyLocation)?;
    let mut node = tree.entries.get(first).ok_or_else(|| not_found(path, 0))?;
    for (i, key) in rest.iter().enumerate() {
        node = node
            .options()
            .and_then(|options| options.get(key))
            .ok_or_else(|| not_found(path, i + 1))?;
    }
    Ok(node)
}

/// Resolve the node at `path` for mutation.
///
/// Callers hold a working copy; the canonical tree is never passed here.
pub fn resolve_mut<'a>(
    tree: &'a mut ComponentsTree,
    path: &MenuPath,
) -> Result<&'a mut OptionNode, TreeError> {
    let (first, rest) = path.keys().split_first().ok_or(TreeError::EmptyLocation)?;
    let mut node = tree
        .entries
        .get_mut(first)
        .ok_or_else(|| not_found(path, 0))?;
    for (i, key) in rest.iter().enumerate() {
        node = node
            .options_mut()
            .and_then(|options| options.get_mut(key))
            .ok_or_else(|| not_found(path, i + 1))?;
    }
    Ok(node)
}

/// Option map addressed by `path`: the top-level map at the root, otherwise
/// the `options` of the resolved parent node.
pub fn children<'a>(
    tree: &'a ComponentsTree,
    path: &MenuPath,
) -> Result<&'a BTreeMap<String, OptionNode>, TreeError> {
    if path.is_root() {
        return Ok(&tree.entries);
    }
    resolve(tree, path)?
        .options()
        .ok_or_else(|| TreeError::NotAContainer(path.to_string()))
}

/// Mutable counterpart of [`children`].
pub fn children_mut<'a>(
    tree: &'a mut ComponentsTree,
    path: &MenuPath,
) -> Result<&'a mut BTreeMap<String, OptionNode>, TreeError> {
    if path.is_root() {
        return Ok(&mut tree.entries);
    }
    resolve_mut(tree, path)?
        .options_mut()
        .ok_or_else(|| TreeError::NotAContainer(path.to_string()))
}
