//! Identifier minting for file versions and pages.

use crate::types::FileId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of fresh, never-reused identifiers
pub trait IdMinter: Send + Sync {
    fn mint(&self) -> FileId;
}

/// Random v4 UUIDs in simple (hyphen-less) form
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidMinter;

impl IdMinter for UuidMinter {
    fn mint(&self) -> FileId {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic `<prefix>-<n>` identifiers
///
/// Used where reproducible ids matter, e.g. fixtures and snapshot comparisons.
#[derive(Debug)]
pub struct SequenceMinter {
    prefix: String,
    next: AtomicU64,
}

impl SequenceMinter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdMinter for SequenceMinter {
    fn mint(&self) -> FileId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}
