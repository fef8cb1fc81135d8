//! Core identifier types for design hierarchies.

/// FileId: identifier of one uploaded asset, shared by every page of a category.
///
/// Identifiers are version tokens: replacing an asset's content mints a new
/// FileId instead of overwriting the old one.
pub type FileId = String;

/// PageId: identifier of one 2-D drawing surface of a category
pub type PageId = String;

/// CategoryCode: human-facing code of a category bucket
pub type CategoryCode = String;

/// DesignId: identifier of the design document that owns a hierarchy
pub type DesignId = String;
