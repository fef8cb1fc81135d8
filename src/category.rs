//! Categories and design hierarchies
//!
//! A design's `hierarchy` maps human category codes to category ids
//! (`categoryMapping`) and holds one [`Category`] per code. A category owns
//! its pages, base drawing and components tree exclusively.

use crate::error::TreeError;
use crate::tree::node::{ComponentsTree, FileRef};
use crate::tree::visit::referenced_file_ids;
use crate::types::{CategoryCode, FileId, PageId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Pages, base drawing and components of one category
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Page name → page id
    #[serde(default)]
    pub pages: BTreeMap<String, PageId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_drawing: Option<FileRef>,
    #[serde(default)]
    pub components: ComponentsTree,
}

/// Asset orphaned by a page removal
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct OrphanedAsset {
    pub file_id: FileId,
    pub page_id: PageId,
}

impl Category {
    pub fn new() -> Self {
        Self::default()
    }

    /// No pages, no base drawing and no components
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.base_drawing.is_none() && self.components.is_empty()
    }

    pub fn page_ids(&self) -> BTreeSet<&PageId> {
        self.pages.values().collect()
    }

    pub fn has_page_id(&self, page_id: &str) -> bool {
        self.pages.values().any(|id| id == page_id)
    }

    /// Every file id referenced by the base drawing or a component leaf
    pub fn referenced_file_ids(&self) -> BTreeSet<FileId> {
        let mut ids = referenced_file_ids(&self.components);
        if let Some(base) = &self.base_drawing {
            ids.insert(base.file_id.clone());
        }
        ids
    }

    /// Add a named page.
    pub fn add_page(&self, name: &str, page_id: PageId) -> Result<Category, TreeError> {
        let name = checked_name(name)?;
        if self.pages.contains_key(name) {
            return Err(TreeError::DuplicateName(name.to_string()));
        }
        let mut next = self.clone();
        next.pages.insert(name.to_string(), page_id);
        Ok(next)
    }

    /// Rename a page, keeping its id.
    pub fn rename_page(&self, name: &str, new_name: &str) -> Result<Category, TreeError> {
        let new_name = checked_name(new_name)?;
        if !self.pages.contains_key(name) {
            return Err(TreeError::UnknownPage(name.to_string()));
        }
        if name == new_name {
            return Ok(self.clone());
        }
        if self.pages.contains_key(new_name) {
            return Err(TreeError::DuplicateName(new_name.to_string()));
        }
        let mut next = self.clone();
        if let Some(id) = next.pages.remove(name) {
            next.pages.insert(new_name.to_string(), id);
        }
        Ok(next)
    }

    /// Remove a page. At least one page must remain.
    ///
    /// Returns the new category and every `(fileId, pageId)` asset that only
    /// existed for the removed page.
    pub fn delete_page(&self, name: &str) -> Result<(Category, Vec<OrphanedAsset>), TreeError> {
        let page_id = self
            .pages
            .get(name)
            .cloned()
            .ok_or_else(|| TreeError::UnknownPage(name.to_string()))?;
        if self.pages.len() <= 1 {
            return Err(TreeError::LastSibling(name.to_string()));
        }

        let mut next = self.clone();
        next.pages.remove(name);
        let orphaned = self
            .referenced_file_ids()
            .into_iter()
            .map(|file_id| OrphanedAsset {
                file_id,
                page_id: page_id.clone(),
            })
            .collect();
        Ok((next, orphaned))
    }
}

/// Category buckets of one design
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hierarchy {
    /// Category code → category uuid
    #[serde(default)]
    pub category_mapping: BTreeMap<CategoryCode, String>,
    #[serde(default)]
    pub categories: BTreeMap<CategoryCode, Category>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self, code: &str) -> Result<&Category, TreeError> {
        self.categories
            .get(code)
            .ok_or_else(|| TreeError::CategoryNotFound(code.to_string()))
    }

    /// Copy of the hierarchy with `code`'s category replaced.
    pub fn with_category(&self, code: &str, category: Category) -> Result<Hierarchy, TreeError> {
        if !self.category_mapping.contains_key(code) && !self.categories.contains_key(code) {
            return Err(TreeError::CategoryNotFound(code.to_string()));
        }
        let mut next = self.clone();
        next.categories.insert(code.to_string(), category);
        Ok(next)
    }

    /// Register a category code with a fresh uuid and an empty category.
    pub fn add_category(&self, code: &str) -> Result<Hierarchy, TreeError> {
        let code = checked_name(code)?;
        if self.category_mapping.contains_key(code) {
            return Err(TreeError::DuplicateName(code.to_string()));
        }
        let mut next = self.clone();
        next.category_mapping
            .insert(code.to_string(), uuid::Uuid::new_v4().to_string());
        next.categories.insert(code.to_string(), Category::new());
        Ok(next)
    }

    /// Every file id referenced by any category
    pub fn referenced_file_ids(&self) -> BTreeSet<FileId> {
        self.categories
            .values()
            .flat_map(|category| category.referenced_file_ids())
            .collect()
    }
}

/// Move the category held under `from` to the `to` bucket, by value.
///
/// The tree shape is untouched; only its containment changes. `to` must be a
/// mapped code whose bucket is absent or empty: pages or a base drawing
/// already held there count as occupied.
pub fn shift_category(hierarchy: &Hierarchy, from: &str, to: &str) -> Result<Hierarchy, TreeError> {
    if !hierarchy.categories.contains_key(from) {
        return Err(TreeError::CategoryNotFound(from.to_string()));
    }
    if !hierarchy.category_mapping.contains_key(to) {
        return Err(TreeError::CategoryNotFound(to.to_string()));
    }
    if from == to {
        return Ok(hierarchy.clone());
    }
    if let Some(existing) = hierarchy.categories.get(to) {
        if !existing.is_empty() {
            return Err(TreeError::CategoryOccupied(to.to_string()));
        }
    }

    let mut next = hierarchy.clone();
    if let Some(category) = next.categories.remove(from) {
        next.categories.insert(to.to_string(), category);
    }
    debug!(from, to, "Shifted category");
    Ok(next)
}

pub(crate) fn checked_name(name: &str) -> Result<&str, TreeError> {
    if name.trim().is_empty() {
        return Err(TreeError::InvalidName(name.to_string()));
    }
    Ok(name)
}
