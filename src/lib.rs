//! design-tree: component hierarchies for multi-page designs
//!
//! A design holds one category per product code. Each category carries its
//! pages, a base drawing and a components tree: attributes (with a selected
//! option) nesting options, where every terminal option references one file
//! drawn once per page. Edits go through an [`session::EditSession`], which
//! keeps undo/redo snapshots and queued uploads until commit.

pub mod category;
pub mod config;
pub mod error;
pub mod history;
pub mod ids;
pub mod logging;
pub mod ops;
pub mod remap;
pub mod session;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod upload;

pub use category::{shift_category, Category, Hierarchy, OrphanedAsset};
pub use error::{ApiError, StorageError, TreeError};
pub use remap::{remap_files, FileUpdateMap};
pub use session::{CommitReport, EditKind, EditSession, SessionState};
pub use tree::{ComponentsTree, MenuPath, OptionNode, Selection};
