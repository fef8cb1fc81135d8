//! File-Identity Remapping
//!
//! Replacing an asset never overwrites it in place. Each replaced file id is
//! assigned a freshly minted id, every leaf referencing the old id is rewritten
//! on a copy of the tree, and the replacement blobs are re-keyed under the new
//! id. Viewers of the committed tree keep resolving the old assets until the
//! new tree is committed.

use crate::category::Category;
use crate::ids::IdMinter;
use crate::tree::node::{ComponentsTree, FileRef};
use crate::tree::path::MenuPath;
use crate::tree::visit::{walk_tree_mut, VisitorMut};
use crate::types::FileId;
use crate::upload::{FileSet, PendingUploads};
use std::collections::BTreeMap;
use tracing::debug;

/// Old file id → freshly minted file id, for one edit session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileUpdateMap {
    entries: BTreeMap<FileId, FileId>,
}

impl FileUpdateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old: FileId, new: FileId) {
        self.entries.insert(old, new);
    }

    pub fn get(&self, old: &str) -> Option<&FileId> {
        self.entries.get(old)
    }

    pub fn contains(&self, old: &str) -> bool {
        self.entries.contains_key(old)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FileId, &FileId)> {
        self.entries.iter()
    }

    /// Copy of `tree` with every mapped leaf id substituted.
    pub fn apply_to_tree(&self, tree: &ComponentsTree) -> ComponentsTree {
        let mut rewritten = tree.clone();
        let mut rewriter = LeafRewriter {
            map: self,
            rewritten: 0,
        };
        walk_tree_mut(&mut rewriter, &mut rewritten);
        debug!(rewritten = rewriter.rewritten, "Rewrote leaf file ids");
        rewritten
    }

    /// Copy of `category` with components and base drawing rewritten.
    pub fn apply_to_category(&self, category: &Category) -> Category {
        let mut rewritten = category.clone();
        rewritten.components = self.apply_to_tree(&category.components);
        if let Some(base) = rewritten.base_drawing.as_mut() {
            if let Some(new_id) = self.get(&base.file_id) {
                base.file_id = new_id.clone();
            }
        }
        rewritten
    }
}

impl FromIterator<(FileId, FileId)> for FileUpdateMap {
    fn from_iter<T: IntoIterator<Item = (FileId, FileId)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

struct LeafRewriter<'a> {
    map: &'a FileUpdateMap,
    rewritten: usize,
}

impl VisitorMut for LeafRewriter<'_> {
    fn visit_leaf_mut(&mut self, _path: &MenuPath, file: &mut FileRef) {
        if let Some(new_id) = self.map.get(&file.file_id) {
            file.file_id = new_id.clone();
            self.rewritten += 1;
        }
    }
}

/// Result of one remap pass
#[derive(Debug, Clone)]
pub struct RemapOutcome {
    pub map: FileUpdateMap,
    pub tree: ComponentsTree,
    /// Replacement blobs keyed by their new ids
    pub uploads: PendingUploads,
}

/// Build the update map from replacements and mint new ids.
///
/// Ids whose replacement set is empty are skipped: they get no entry and
/// their leaves stay untouched.
pub fn build_update_map(
    replacements: &BTreeMap<FileId, FileSet>,
    minter: &dyn IdMinter,
) -> FileUpdateMap {
    replacements
        .iter()
        .filter(|(_, files)| !files.is_empty())
        .map(|(old, _)| (old.clone(), minter.mint()))
        .collect()
}

/// Remap replaced file ids across `tree`.
pub fn remap_files(
    tree: &ComponentsTree,
    replacements: BTreeMap<FileId, FileSet>,
    minter: &dyn IdMinter,
) -> RemapOutcome {
    let map = build_update_map(&replacements, minter);
    let tree = map.apply_to_tree(tree);
    let uploads = replacements
        .into_iter()
        .filter_map(|(old, files)| map.get(&old).map(|new_id| (new_id.clone(), files)))
        .collect();

    debug!(remapped = map.len(), "Built file update map");
    RemapOutcome { map, tree, uploads }
}
