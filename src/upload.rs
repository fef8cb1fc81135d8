//! Upload payloads: per-page blobs grouped under one logical file id.

use crate::error::TreeError;
use crate::types::{FileId, PageId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One page's drawing bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Blob {
    pub fn new(content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn svg(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new("image/svg+xml", bytes)
    }

    /// Hex blake3 digest of the bytes
    pub fn digest(&self) -> String {
        hex::encode(blake3::hash(&self.bytes).as_bytes())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Full per-page set of drawings for one file id
pub type FileSet = BTreeMap<PageId, Blob>;

/// Check that `files` covers exactly the selected pages.
///
/// At least one page must be selected and every selected page needs a file.
pub fn check_upload_complete(selected_pages: &[PageId], files: &FileSet) -> Result<(), TreeError> {
    let selected: BTreeSet<&PageId> = selected_pages.iter().collect();
    let missing: Vec<PageId> = selected
        .iter()
        .filter(|page| !files.contains_key(page.as_str()))
        .map(|page| (*page).clone())
        .collect();
    let stray = files.keys().any(|page| !selected.contains(page));

    if selected.is_empty() || !missing.is_empty() || stray || files.len() != selected.len() {
        return Err(TreeError::IncompleteUpload {
            expected: selected.len(),
            received: files.len(),
            missing,
        });
    }
    Ok(())
}

/// Blobs queued in an edit session, waiting for commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingUploads {
    sets: BTreeMap<FileId, FileSet>,
}

impl PendingUploads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, file_id: FileId, files: FileSet) {
        self.sets.insert(file_id, files);
    }

    pub fn get(&self, file_id: &str) -> Option<&FileSet> {
        self.sets.get(file_id)
    }

    pub fn contains(&self, file_id: &str) -> bool {
        self.sets.contains_key(file_id)
    }

    pub fn remove(&mut self, file_id: &str) -> Option<FileSet> {
        self.sets.remove(file_id)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn file_ids(&self) -> impl Iterator<Item = &FileId> {
        self.sets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FileId, &FileSet)> {
        self.sets.iter()
    }

    /// Total number of per-page blobs queued
    pub fn blob_count(&self) -> usize {
        self.sets.values().map(|set| set.len()).sum()
    }

    /// Drop queued sets whose id is not in `keep`; returns the dropped ids.
    pub fn retain_referenced(&mut self, keep: &BTreeSet<FileId>) -> Vec<FileId> {
        let dropped: Vec<FileId> = self
            .sets
            .keys()
            .filter(|id| !keep.contains(*id))
            .cloned()
            .collect();
        for id in &dropped {
            self.sets.remove(id);
        }
        dropped
    }

    pub fn extend(&mut self, other: PendingUploads) {
        self.sets.extend(other.sets);
    }
}

impl FromIterator<(FileId, FileSet)> for PendingUploads {
    fn from_iter<T: IntoIterator<Item = (FileId, FileSet)>>(iter: T) -> Self {
        Self {
            sets: iter.into_iter().collect(),
        }
    }
}
