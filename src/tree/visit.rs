//! Tagged-union traversal of component trees
//!
//! Walks dispatch on [`OptionNode`] variants instead of probing for fields, so
//! leaves and parents are handled by distinct visitor callbacks.

use crate::tree::node::{AttributeNode, ComponentsTree, FileRef, OptionNode};
use crate::tree::path::MenuPath;
use crate::types::FileId;
use std::collections::BTreeSet;

/// Read-only visitor. Paths passed to callbacks are absolute from the tree root.
pub trait Visitor {
    fn visit_leaf(&mut self, _path: &MenuPath, _file: &FileRef) {}

    fn visit_parent(&mut self, _path: &MenuPath, _attr: &AttributeNode) {}
}

/// Mutating visitor used for in-place rewrites of a working copy.
pub trait VisitorMut {
    fn visit_leaf_mut(&mut self, _path: &MenuPath, _file: &mut FileRef) {}

    fn visit_parent_mut(&mut self, _path: &MenuPath, _attr: &mut AttributeNode) {}
}

/// Walk one node and its whole subtree, depth first, parents before children.
pub fn walk_node<V: Visitor + ?Sized>(visitor: &mut V, path: &MenuPath, node: &OptionNode) {
    match node {
        OptionNode::Leaf(file) => visitor.visit_leaf(path, file),
        OptionNode::Parent(attr) => {
            visitor.visit_parent(path, attr);
            for (key, child) in &attr.options {
                walk_node(visitor, &path.child(key.as_str()), child);
            }
        }
    }
}

pub fn walk_tree<V: Visitor + ?Sized>(visitor: &mut V, tree: &ComponentsTree) {
    for (key, node) in &tree.entries {
        walk_node(visitor, &MenuPath::new([key.as_str()]), node);
    }
}

pub fn walk_node_mut<V: VisitorMut + ?Sized>(
    visitor: &mut V,
    path: &MenuPath,
    node: &mut OptionNode,
) {
    match node {
        OptionNode::Leaf(file) => visitor.visit_leaf_mut(path, file),
        OptionNode::Parent(attr) => {
            visitor.visit_parent_mut(path, attr);
            for (key, child) in attr.options.iter_mut() {
                walk_node_mut(visitor, &path.child(key.as_str()), child);
            }
        }
    }
}

pub fn walk_tree_mut<V: VisitorMut + ?Sized>(visitor: &mut V, tree: &mut ComponentsTree) {
    for (key, node) in tree.entries.iter_mut() {
        walk_node_mut(visitor, &MenuPath::new([key.as_str()]), node);
    }
}

/// Collects every leaf file id, in traversal order, duplicates kept
#[derive(Debug, Default)]
pub struct FileIdCollector {
    pub file_ids: Vec<FileId>,
}

impl Visitor for FileIdCollector {
    fn visit_leaf(&mut self, _path: &MenuPath, file: &FileRef) {
        self.file_ids.push(file.file_id.clone());
    }
}

/// Every leaf file id found under `node`, including `node` itself.
pub fn collect_subtree_file_ids(path: &MenuPath, node: &OptionNode) -> Vec<FileId> {
    let mut collector = FileIdCollector::default();
    walk_node(&mut collector, path, node);
    collector.file_ids
}

/// Distinct file ids referenced anywhere in the tree.
pub fn referenced_file_ids(tree: &ComponentsTree) -> BTreeSet<FileId> {
    let mut collector = FileIdCollector::default();
    walk_tree(&mut collector, tree);
    collector.file_ids.into_iter().collect()
}

/// Counts nodes per variant and the maximum depth reached
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub leaves: usize,
    pub parents: usize,
    pub max_depth: usize,
}

impl Visitor for TreeStats {
    fn visit_leaf(&mut self, path: &MenuPath, _file: &FileRef) {
        self.leaves += 1;
        self.max_depth = self.max_depth.max(path.depth());
    }

    fn visit_parent(&mut self, path: &MenuPath, _attr: &AttributeNode) {
        self.parents += 1;
        self.max_depth = self.max_depth.max(path.depth());
    }
}

pub fn tree_stats(tree: &ComponentsTree) -> TreeStats {
    let mut stats = TreeStats::default();
    walk_tree(&mut stats, tree);
    stats
}
