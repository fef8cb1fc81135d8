//! Collaborator ports
//!
//! The document store persists whole hierarchies (last write wins, no
//! field-level patches). The asset store keeps one blob per
//! `(fileId, pageId)`; the editing core only passes blobs through.

pub mod memory;
pub mod persistence;

use crate::category::Hierarchy;
use crate::error::StorageError;
use crate::types::{DesignId, FileId, PageId};
use crate::upload::Blob;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use memory::{MemoryAssetStore, MemoryDesignStore};
pub use persistence::{open_database, SledAssetStore, SledDesignStore};

/// Metadata of one stored asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub file_id: FileId,
    pub page_id: PageId,
    pub content_type: String,
    pub size: u64,
    /// Hex blake3 digest of the stored bytes
    pub digest: String,
    pub stored_at: DateTime<Utc>,
}

impl AssetRecord {
    pub fn for_blob(file_id: &str, page_id: &str, blob: &Blob) -> Self {
        Self {
            file_id: file_id.to_string(),
            page_id: page_id.to_string(),
            content_type: blob.content_type.clone(),
            size: blob.len() as u64,
            digest: blob.digest(),
            stored_at: Utc::now(),
        }
    }
}

/// Persistence collaborator for design hierarchies
#[async_trait]
pub trait DesignStore: Send + Sync {
    async fn load(&self, design_id: &str) -> Result<Option<Hierarchy>, StorageError>;

    /// Replace the whole hierarchy document of `design_id`.
    async fn replace(&self, design_id: &str, hierarchy: &Hierarchy) -> Result<(), StorageError>;

    async fn list(&self) -> Result<Vec<DesignId>, StorageError>;
}

/// Asset storage collaborator
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn put(&self, file_id: &str, page_id: &str, blob: &Blob)
        -> Result<AssetRecord, StorageError>;

    async fn exists(&self, file_id: &str, page_id: &str) -> Result<bool, StorageError>;

    async fn get(&self, file_id: &str, page_id: &str) -> Result<Option<Blob>, StorageError>;

    /// Remove every page's asset for `file_id`; returns how many were removed.
    async fn delete_file(&self, file_id: &str) -> Result<usize, StorageError>;

    async fn delete_asset(&self, file_id: &str, page_id: &str) -> Result<bool, StorageError>;
}
