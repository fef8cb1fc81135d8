//! Error types for tree editing, storage and the session layer.

use crate::types::{FileId, PageId};
use thiserror::Error;

/// Errors raised by tree resolution and mutation.
///
/// All of these are recoverable at the edit-session level: the working copy is
/// left unchanged and the caller may retry with different parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Name '{0}' already exists among its siblings")]
    DuplicateName(String),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error(
        "Incomplete upload: {received} file(s) for {expected} selected page(s), missing pages {missing:?}"
    )]
    IncompleteUpload {
        expected: usize,
        received: usize,
        missing: Vec<PageId>,
    },

    #[error("Cannot delete the last remaining page: {0}")]
    LastSibling(String),

    #[error("Node at {0} does not hold options")]
    NotAContainer(String),

    #[error("Node at {0} is not a file leaf")]
    NotALeaf(String),

    #[error("Option '{option}' does not exist at {path}")]
    UnknownOption { path: String, option: String },

    #[error("Page not found: {0}")]
    UnknownPage(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Category already holds components: {0}")]
    CategoryOccupied(String),

    #[error("Location must name at least one key")]
    EmptyLocation,
}

/// Errors raised by the persistence and asset collaborators.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Design not found: {0}")]
    DesignNotFound(String),

    #[error("Asset not found: {file_id}/{page_id}")]
    AssetNotFound { file_id: FileId, page_id: PageId },

    #[error("Asset {file_id}/{page_id} failed integrity check")]
    Integrity { file_id: FileId, page_id: PageId },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error surfaced to session callers and the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Another edit is already open: {0}")]
    SessionBusy(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
