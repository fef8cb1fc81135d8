//! Sled-backed document and asset stores
//!
//! Both stores share one database. Hierarchies are stored as JSON under their
//! design id in the `designs` tree; assets are stored as JSON records under
//! `fileId \0 pageId` in the `assets` tree so a file's pages share a prefix.

use super::{AssetRecord, AssetStore, DesignStore};
use crate::category::Hierarchy;
use crate::error::StorageError;
use crate::types::DesignId;
use crate::upload::Blob;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

const DESIGNS_TREE: &str = "designs";
const ASSETS_TREE: &str = "assets";

/// Open (or create) the sled database at `path`.
pub fn open_database(path: &Path) -> Result<sled::Db, StorageError> {
    let db = sled::open(path)?;
    debug!(path = %path.display(), "Opened sled database");
    Ok(db)
}

pub struct SledDesignStore {
    designs: sled::Tree,
}

impl SledDesignStore {
    pub fn new(db: &sled::Db) -> Result<Self, StorageError> {
        Ok(Self {
            designs: db.open_tree(DESIGNS_TREE)?,
        })
    }
}

#[async_trait]
impl DesignStore for SledDesignStore {
    async fn load(&self, design_id: &str) -> Result<Option<Hierarchy>, StorageError> {
        match self.designs.get(design_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn replace(&self, design_id: &str, hierarchy: &Hierarchy) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(hierarchy)?;
        self.designs.insert(design_id.as_bytes(), bytes)?;
        self.designs.flush()?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DesignId>, StorageError> {
        let mut ids = Vec::new();
        for entry in self.designs.iter() {
            let (key, _) = entry?;
            match String::from_utf8(key.to_vec()) {
                Ok(id) => ids.push(id),
                Err(e) => warn!("Skipping non UTF-8 design key: {}", e),
            }
        }
        Ok(ids)
    }
}

#[derive(Serialize, Deserialize)]
struct StoredAsset {
    record: AssetRecord,
    blob: Blob,
}

pub struct SledAssetStore {
    assets: sled::Tree,
}

impl SledAssetStore {
    pub fn new(db: &sled::Db) -> Result<Self, StorageError> {
        Ok(Self {
            assets: db.open_tree(ASSETS_TREE)?,
        })
    }

    fn key(file_id: &str, page_id: &str) -> Vec<u8> {
        let mut key = Self::prefix(file_id);
        key.extend_from_slice(page_id.as_bytes());
        key
    }

    fn prefix(file_id: &str) -> Vec<u8> {
        let mut key = file_id.as_bytes().to_vec();
        key.push(0);
        key
    }

    /// Stored record for an asset, without its bytes
    pub fn record(&self, file_id: &str, page_id: &str) -> Result<Option<AssetRecord>, StorageError> {
        match self.assets.get(Self::key(file_id, page_id))? {
            Some(bytes) => {
                let stored: StoredAsset = serde_json::from_slice(&bytes)?;
                Ok(Some(stored.record))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AssetStore for SledAssetStore {
    async fn put(
        &self,
        file_id: &str,
        page_id: &str,
        blob: &Blob,
    ) -> Result<AssetRecord, StorageError> {
        let record = AssetRecord::for_blob(file_id, page_id, blob);
        let stored = StoredAsset {
            record: record.clone(),
            blob: blob.clone(),
        };
        self.assets
            .insert(Self::key(file_id, page_id), serde_json::to_vec(&stored)?)?;
        self.assets.flush()?;
        Ok(record)
    }

    async fn exists(&self, file_id: &str, page_id: &str) -> Result<bool, StorageError> {
        Ok(self.assets.contains_key(Self::key(file_id, page_id))?)
    }

    async fn get(&self, file_id: &str, page_id: &str) -> Result<Option<Blob>, StorageError> {
        let bytes = match self.assets.get(Self::key(file_id, page_id))? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let stored: StoredAsset = serde_json::from_slice(&bytes)?;
        if stored.blob.digest() != stored.record.digest {
            return Err(StorageError::Integrity {
                file_id: file_id.to_string(),
                page_id: page_id.to_string(),
            });
        }
        Ok(Some(stored.blob))
    }

    async fn delete_file(&self, file_id: &str) -> Result<usize, StorageError> {
        let mut removed = 0;
        for entry in self.assets.scan_prefix(Self::prefix(file_id)) {
            let (key, _) = entry?;
            if self.assets.remove(key)?.is_some() {
                removed += 1;
            }
        }
        self.assets.flush()?;
        Ok(removed)
    }

    async fn delete_asset(&self, file_id: &str, page_id: &str) -> Result<bool, StorageError> {
        let removed = self.assets.remove(Self::key(file_id, page_id))?.is_some();
        self.assets.flush()?;
        Ok(removed)
    }
}
