//! Edit sessions
//!
//! An [`EditSession`] is the explicit context for editing one design: the
//! canonical hierarchy it was opened from, an undo/redo history of working
//! snapshots, the blobs queued for upload and the edit currently open in the
//! editor. Every operation produces a new snapshot through the pure functions
//! in [`crate::ops`]; a failed operation leaves the working copy unchanged.
//!
//! Nothing reaches the collaborators until [`EditSession::commit`]. A failed
//! commit keeps the working copy and the queue so the user can retry.

use crate::category::{shift_category, Category, Hierarchy, OrphanedAsset};
use crate::config::SessionConfig;
use crate::error::{ApiError, TreeError};
use crate::history::History;
use crate::ids::{IdMinter, UuidMinter};
use crate::ops;
use crate::remap::{remap_files, FileUpdateMap};
use crate::store::{AssetStore, DesignStore};
use crate::tree::node::{ComponentsTree, FileRef, Selection};
use crate::tree::path::MenuPath;
use crate::types::{CategoryCode, DesignId, FileId, PageId};
use crate::upload::{check_upload_complete, FileSet, PendingUploads};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Kind of edit open in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EditKind {
    Add,
    Rename,
    Delete,
    Update,
    Select,
    Replace,
    Shift,
    Pages,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditKind::Add => "add",
            EditKind::Rename => "rename",
            EditKind::Delete => "delete",
            EditKind::Update => "update",
            EditKind::Select => "select",
            EditKind::Replace => "replace",
            EditKind::Shift => "shift",
            EditKind::Pages => "pages",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Editing { kind: EditKind, path: MenuPath },
}

/// One history entry: the hierarchy plus the category being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub hierarchy: Hierarchy,
    pub category: CategoryCode,
}

/// Summary of a successful commit
#[derive(Debug, Clone, Serialize)]
pub struct CommitReport {
    pub design_id: DesignId,
    pub uploaded_files: Vec<FileId>,
    pub uploaded_blobs: usize,
    pub deleted_files: Vec<FileId>,
    pub deleted_page_assets: usize,
    pub gc_failures: usize,
    pub committed_at: DateTime<Utc>,
}

pub struct EditSession {
    design_id: DesignId,
    canonical: Hierarchy,
    canonical_category: CategoryCode,
    history: History<Snapshot>,
    pending: PendingUploads,
    removed_files: Vec<FileId>,
    orphaned_assets: Vec<OrphanedAsset>,
    state: SessionState,
    minter: Arc<dyn IdMinter>,
    config: SessionConfig,
}

impl EditSession {
    /// Open a session on `hierarchy`, editing `category`.
    pub fn open(
        design_id: impl Into<DesignId>,
        hierarchy: Hierarchy,
        category: &str,
        config: SessionConfig,
    ) -> Result<Self, ApiError> {
        hierarchy.category(category)?;
        let snapshot = Snapshot {
            hierarchy: hierarchy.clone(),
            category: category.to_string(),
        };
        Ok(Self {
            design_id: design_id.into(),
            canonical: hierarchy,
            canonical_category: category.to_string(),
            history: History::new(snapshot).with_capacity_limit(config.history_limit),
            pending: PendingUploads::new(),
            removed_files: Vec::new(),
            orphaned_assets: Vec::new(),
            state: SessionState::Idle,
            minter: Arc::new(UuidMinter),
            config,
        })
    }

    /// Read the canonical hierarchy from `store` and open a session on it.
    pub async fn load(
        store: &dyn DesignStore,
        design_id: &str,
        category: &str,
        config: SessionConfig,
    ) -> Result<Self, ApiError> {
        let hierarchy = store
            .load(design_id)
            .await?
            .ok_or_else(|| crate::error::StorageError::DesignNotFound(design_id.to_string()))?;
        Self::open(design_id, hierarchy, category, config)
    }

    /// Replace the identifier source used for new files and pages.
    pub fn with_minter(mut self, minter: Arc<dyn IdMinter>) -> Self {
        self.minter = minter;
        self
    }

    pub fn design_id(&self) -> &str {
        &self.design_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn canonical(&self) -> &Hierarchy {
        &self.canonical
    }

    pub fn working(&self) -> &Hierarchy {
        &self.history.current().hierarchy
    }

    pub fn active_category_code(&self) -> &str {
        &self.history.current().category
    }

    pub fn active_category(&self) -> Result<&Category, TreeError> {
        let snapshot = self.history.current();
        snapshot.hierarchy.category(&snapshot.category)
    }

    pub fn components(&self) -> Result<&ComponentsTree, TreeError> {
        Ok(&self.active_category()?.components)
    }

    pub fn pending(&self) -> &PendingUploads {
        &self.pending
    }

    /// File ids removed by deletes in this session, in order
    pub fn removed_files(&self) -> &[FileId] {
        &self.removed_files
    }

    pub fn is_dirty(&self) -> bool {
        self.working() != &self.canonical
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Open an edit dialog for `path`.
    pub fn begin(&mut self, kind: EditKind, path: MenuPath) -> Result<(), ApiError> {
        self.guard(kind, &path)?;
        debug!(kind = %kind, path = %path, "Edit opened");
        self.state = SessionState::Editing { kind, path };
        Ok(())
    }

    /// Close the open edit dialog without applying anything.
    pub fn cancel(&mut self) {
        if let SessionState::Editing { kind, path } = &self.state {
            debug!(kind = %kind, path = %path, "Edit cancelled");
        }
        self.state = SessionState::Idle;
    }

    fn guard(&self, kind: EditKind, path: &MenuPath) -> Result<(), ApiError> {
        match &self.state {
            SessionState::Idle => Ok(()),
            SessionState::Editing {
                kind: open_kind,
                path: open_path,
            } if *open_kind == kind && open_path == path => Ok(()),
            SessionState::Editing {
                kind: open_kind,
                path: open_path,
            } => Err(ApiError::SessionBusy(format!("{} at {}", open_kind, open_path))),
        }
    }

    fn record(&mut self, hierarchy: Hierarchy, category: CategoryCode) {
        self.history.record(Snapshot {
            hierarchy,
            category,
        });
        self.state = SessionState::Idle;
    }

    fn record_category(&mut self, category: Category) -> Result<(), ApiError> {
        let code = self.active_category_code().to_string();
        let hierarchy = self.working().with_category(&code, category)?;
        self.record(hierarchy, code);
        Ok(())
    }

    fn record_tree(&mut self, tree: ComponentsTree) -> Result<(), ApiError> {
        let mut category = self.active_category()?.clone();
        category.components = tree;
        self.record_category(category)
    }

    fn check_pages(&self, pages: &[PageId]) -> Result<(), ApiError> {
        let category = self.active_category()?;
        for page in pages {
            if !category.has_page_id(page) {
                return Err(TreeError::UnknownPage(page.clone()).into());
            }
        }
        Ok(())
    }

    /// Add a file leaf under `parent`; the files are queued under the minted id.
    pub fn add_leaf(
        &mut self,
        parent: &MenuPath,
        name: &str,
        selected_pages: &[PageId],
        files: FileSet,
    ) -> Result<FileId, ApiError> {
        self.guard(EditKind::Add, parent)?;
        self.check_pages(selected_pages)?;
        let added = ops::add_leaf(
            self.components()?,
            parent,
            name,
            selected_pages,
            &files,
            self.minter.as_ref(),
        )?;
        self.record_tree(added.tree)?;
        self.pending.queue(added.file_id.clone(), files);
        Ok(added.file_id)
    }

    pub fn add_parent(&mut self, parent: &MenuPath, name: &str) -> Result<(), ApiError> {
        self.guard(EditKind::Add, parent)?;
        let tree = ops::add_parent(self.components()?, parent, name)?;
        self.record_tree(tree)
    }

    pub fn rename(&mut self, path: &MenuPath, new_name: &str) -> Result<(), ApiError> {
        self.guard(EditKind::Rename, path)?;
        let tree = ops::rename(self.components()?, path, new_name)?;
        self.record_tree(tree)
    }

    /// Delete the node at `path`; returns the file ids of its subtree.
    pub fn delete(&mut self, path: &MenuPath) -> Result<Vec<FileId>, ApiError> {
        self.guard(EditKind::Delete, path)?;
        let deleted = ops::delete(self.components()?, path)?;
        self.record_tree(deleted.tree)?;
        self.removed_files
            .extend(deleted.removed_file_ids.iter().cloned());
        Ok(deleted.removed_file_ids)
    }

    /// Replace the drawing set of the leaf at `path` under a fresh file id.
    pub fn update_file(
        &mut self,
        path: &MenuPath,
        selected_pages: &[PageId],
        files: FileSet,
    ) -> Result<FileId, ApiError> {
        self.guard(EditKind::Update, path)?;
        self.check_pages(selected_pages)?;
        check_upload_complete(selected_pages, &files)?;
        let new_id = self.minter.mint();
        let updated = ops::update_leaf(self.components()?, path, new_id.clone())?;
        self.record_tree(updated.tree)?;
        self.pending.queue(new_id.clone(), files);
        Ok(new_id)
    }

    /// Replace several files at once across the whole category.
    ///
    /// Every leaf and the base drawing referencing a replaced id are rewritten
    /// to the id minted for it. Ids with an empty replacement set are skipped.
    pub fn replace_files(
        &mut self,
        replacements: BTreeMap<FileId, FileSet>,
    ) -> Result<FileUpdateMap, ApiError> {
        self.guard(EditKind::Replace, &MenuPath::root())?;
        let category = self.active_category()?.clone();
        for (file_id, files) in &replacements {
            if files.is_empty() {
                continue;
            }
            let pages: Vec<PageId> = files.keys().cloned().collect();
            self.check_pages(&pages)?;
            check_upload_complete(&self.replacement_pages(&category, file_id), files)?;
        }

        let outcome = remap_files(&category.components, replacements, self.minter.as_ref());
        if outcome.map.is_empty() {
            self.state = SessionState::Idle;
            return Ok(outcome.map);
        }
        let mut next = outcome.map.apply_to_category(&category);
        next.components = outcome.tree;
        self.record_category(next)?;

        // Sets queued under the replaced ids stay queued for undo; commit
        // drops whatever the committed document no longer references.
        self.pending.extend(outcome.uploads);
        info!(replaced = outcome.map.len(), "Replaced files");
        Ok(outcome.map)
    }

    /// Pages a replacement set for `file_id` must cover.
    ///
    /// A file queued in this session keeps the pages it was queued with; any
    /// other file, the base drawing included, is replaced on every page.
    fn replacement_pages(&self, category: &Category, file_id: &str) -> Vec<PageId> {
        match self.pending.get(file_id) {
            Some(queued) => queued
                .keys()
                .filter(|page| category.has_page_id(page))
                .cloned()
                .collect(),
            None => category.pages.values().cloned().collect(),
        }
    }

    pub fn select(&mut self, path: &MenuPath, selection: Selection) -> Result<(), ApiError> {
        self.guard(EditKind::Select, path)?;
        let tree = ops::select_option(self.components()?, path, selection)?;
        self.record_tree(tree)
    }

    /// Upload a new base drawing covering every page of the category.
    pub fn set_base_drawing(&mut self, files: FileSet) -> Result<FileId, ApiError> {
        self.guard(EditKind::Update, &MenuPath::root())?;
        let pages: Vec<PageId> = self.active_category()?.pages.values().cloned().collect();
        check_upload_complete(&pages, &files)?;
        let file_id = self.minter.mint();
        let mut category = self.active_category()?.clone();
        category.base_drawing = Some(FileRef::new(file_id.clone()));
        self.record_category(category)?;
        self.pending.queue(file_id.clone(), files);
        Ok(file_id)
    }

    /// Move the edited category to the `to` bucket and keep editing it there.
    pub fn shift_category(&mut self, to: &str) -> Result<(), ApiError> {
        self.guard(EditKind::Shift, &MenuPath::root())?;
        let from = self.active_category_code().to_string();
        let hierarchy = shift_category(self.working(), &from, to)?;
        self.record(hierarchy, to.to_string());
        info!(from = %from, to, "Category shifted");
        Ok(())
    }

    pub fn add_page(&mut self, name: &str) -> Result<PageId, ApiError> {
        self.guard(EditKind::Pages, &MenuPath::root())?;
        let page_id = uuid::Uuid::new_v4().to_string();
        let category = self.active_category()?.add_page(name, page_id.clone())?;
        self.record_category(category)?;
        Ok(page_id)
    }

    pub fn rename_page(&mut self, name: &str, new_name: &str) -> Result<(), ApiError> {
        self.guard(EditKind::Pages, &MenuPath::root())?;
        let category = self.active_category()?.rename_page(name, new_name)?;
        self.record_category(category)
    }

    /// Delete a page; the last remaining page cannot be deleted.
    pub fn delete_page(&mut self, name: &str) -> Result<Vec<OrphanedAsset>, ApiError> {
        self.guard(EditKind::Pages, &MenuPath::root())?;
        let (category, orphaned) = self.active_category()?.delete_page(name)?;
        self.record_category(category)?;
        self.orphaned_assets.extend(orphaned.iter().cloned());
        Ok(orphaned)
    }

    pub fn undo(&mut self) -> Result<(), ApiError> {
        self.history.undo().ok_or(ApiError::NothingToUndo)?;
        self.state = SessionState::Idle;
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), ApiError> {
        self.history.redo().ok_or(ApiError::NothingToRedo)?;
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Drop every uncommitted change and queued upload.
    pub fn discard(&mut self) {
        self.history = History::new(Snapshot {
            hierarchy: self.canonical.clone(),
            category: self.canonical_category.clone(),
        })
        .with_capacity_limit(self.config.history_limit);
        self.pending = PendingUploads::new();
        self.removed_files.clear();
        self.orphaned_assets.clear();
        self.state = SessionState::Idle;
    }

    /// Submit the working copy.
    ///
    /// Blobs are uploaded under their new ids first, then the hierarchy
    /// document is replaced as a whole. Until the document write succeeds the
    /// canonical document is untouched; on any error the session keeps its
    /// working copy and queue. Assets that the canonical hierarchy referenced
    /// and the committed one no longer does are deleted afterwards; deletion
    /// failures are logged and counted, never returned.
    pub async fn commit(
        &mut self,
        documents: &dyn DesignStore,
        assets: &dyn AssetStore,
    ) -> Result<CommitReport, ApiError> {
        let working = self.working().clone();
        let referenced = working.referenced_file_ids();

        let mut uploads = self.pending.clone();
        let dropped = uploads.retain_referenced(&referenced);
        if !dropped.is_empty() {
            debug!(dropped = dropped.len(), "Skipping uploads no longer referenced");
        }

        let puts = uploads.iter().flat_map(|(file_id, files)| {
            files
                .iter()
                .map(move |(page_id, blob)| assets.put(file_id, page_id, blob))
        });
        let records = try_join_all(puts).await?;
        debug!(blobs = records.len(), "Uploaded pending blobs");

        documents.replace(&self.design_id, &working).await?;
        info!(design_id = %self.design_id, "Committed hierarchy");

        let stale: Vec<FileId> = self
            .canonical
            .referenced_file_ids()
            .difference(&referenced)
            .cloned()
            .collect();
        let (deleted_page_assets, gc_failures) = if self.config.collect_garbage {
            self.collect_garbage(assets, &stale, &referenced).await
        } else {
            (0, 0)
        };

        let report = CommitReport {
            design_id: self.design_id.clone(),
            uploaded_files: uploads.file_ids().cloned().collect(),
            uploaded_blobs: records.len(),
            deleted_files: if self.config.collect_garbage {
                stale
            } else {
                Vec::new()
            },
            deleted_page_assets,
            gc_failures,
            committed_at: Utc::now(),
        };

        self.canonical = working;
        self.canonical_category = self.active_category_code().to_string();
        self.history.collapse();
        self.pending = PendingUploads::new();
        self.removed_files.clear();
        self.orphaned_assets.clear();
        self.state = SessionState::Idle;
        Ok(report)
    }

    async fn collect_garbage(
        &self,
        assets: &dyn AssetStore,
        stale: &[FileId],
        referenced: &BTreeSet<FileId>,
    ) -> (usize, usize) {
        let mut failures = 0;
        for file_id in stale {
            if let Err(e) = assets.delete_file(file_id).await {
                warn!(file_id = %file_id, "Failed to delete stale asset: {}", e);
                failures += 1;
            }
        }

        let live_pages: BTreeSet<&PageId> = self
            .working()
            .categories
            .values()
            .flat_map(|category| category.pages.values())
            .collect();
        let mut deleted_page_assets = 0;
        for orphan in &self.orphaned_assets {
            if !referenced.contains(&orphan.file_id) || live_pages.contains(&orphan.page_id) {
                continue;
            }
            match assets.delete_asset(&orphan.file_id, &orphan.page_id).await {
                Ok(true) => deleted_page_assets += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        file_id = %orphan.file_id,
                        page_id = %orphan.page_id,
                        "Failed to delete orphaned page asset: {}",
                        e
                    );
                    failures += 1;
                }
            }
        }
        (deleted_page_assets, failures)
    }
}
