//! Component tree schema, path resolution and traversal.

pub mod node;
pub mod path;
pub mod validate;
pub mod visit;

pub use node::{AttributeNode, ComponentsTree, FileRef, OptionNode, Selection};
pub use path::{children, children_mut, resolve, resolve_mut, MenuPath};
pub use validate::{dangling_selections, validate, DanglingSelection, TreeReport};
pub use visit::{
    collect_subtree_file_ids, referenced_file_ids, tree_stats, walk_node, walk_node_mut,
    walk_tree, walk_tree_mut, TreeStats, Visitor, VisitorMut,
};
