//! In-memory collaborators with failure injection.

use super::{AssetRecord, AssetStore, DesignStore};
use crate::category::Hierarchy;
use crate::error::StorageError;
use crate::types::{DesignId, FileId, PageId};
use crate::upload::Blob;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct MemoryDesignStore {
    documents: RwLock<HashMap<DesignId, Hierarchy>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryDesignStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_design(self, design_id: &str, hierarchy: Hierarchy) -> Self {
        self.documents.write().insert(design_id.to_string(), hierarchy);
        self
    }

    /// Make every following `replace` fail until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `replace` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self, design_id: &str) -> Option<Hierarchy> {
        self.documents.read().get(design_id).cloned()
    }
}

#[async_trait]
impl DesignStore for MemoryDesignStore {
    async fn load(&self, design_id: &str) -> Result<Option<Hierarchy>, StorageError> {
        Ok(self.snapshot(design_id))
    }

    async fn replace(&self, design_id: &str, hierarchy: &Hierarchy) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!(
                "document store rejected write for {}",
                design_id
            )));
        }
        self.documents
            .write()
            .insert(design_id.to_string(), hierarchy.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DesignId>, StorageError> {
        let mut ids: Vec<DesignId> = self.documents.read().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    assets: RwLock<HashMap<(FileId, PageId), (AssetRecord, Blob)>>,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.assets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.read().is_empty()
    }

    /// Distinct file ids with at least one stored page asset
    pub fn file_ids(&self) -> Vec<FileId> {
        let mut ids: Vec<FileId> = self
            .assets
            .read()
            .keys()
            .map(|(file_id, _)| file_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn put(
        &self,
        file_id: &str,
        page_id: &str,
        blob: &Blob,
    ) -> Result<AssetRecord, StorageError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!(
                "asset store rejected {}/{}",
                file_id, page_id
            )));
        }
        let record = AssetRecord::for_blob(file_id, page_id, blob);
        self.assets.write().insert(
            (file_id.to_string(), page_id.to_string()),
            (record.clone(), blob.clone()),
        );
        Ok(record)
    }

    async fn exists(&self, file_id: &str, page_id: &str) -> Result<bool, StorageError> {
        Ok(self
            .assets
            .read()
            .contains_key(&(file_id.to_string(), page_id.to_string())))
    }

    async fn get(&self, file_id: &str, page_id: &str) -> Result<Option<Blob>, StorageError> {
        Ok(self
            .assets
            .read()
            .get(&(file_id.to_string(), page_id.to_string()))
            .map(|(_, blob)| blob.clone()))
    }

    async fn delete_file(&self, file_id: &str) -> Result<usize, StorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!(
                "asset store rejected delete of {}",
                file_id
            )));
        }
        let mut assets = self.assets.write();
        let before = assets.len();
        assets.retain(|(id, _), _| id != file_id);
        Ok(before - assets.len())
    }

    async fn delete_asset(&self, file_id: &str, page_id: &str) -> Result<bool, StorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!(
                "asset store rejected delete of {}/{}",
                file_id, page_id
            )));
        }
        Ok(self
            .assets
            .write()
            .remove(&(file_id.to_string(), page_id.to_string()))
            .is_some())
    }
}
