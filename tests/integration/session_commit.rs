use super::support::{hierarchy, svg_files};
use design_tree::config::SessionConfig;
use design_tree::ids::SequenceMinter;
use design_tree::store::{AssetStore, MemoryAssetStore, MemoryDesignStore};
use design_tree::{ApiError, EditSession, MenuPath, StorageError};
use std::collections::BTreeMap;
use std::sync::Arc;

async fn open(store: &MemoryDesignStore) -> EditSession {
    EditSession::load(store, "d1", "SHIRT", SessionConfig::default())
        .await
        .unwrap()
        .with_minter(Arc::new(SequenceMinter::new("new")))
}

async fn seeded_assets() -> MemoryAssetStore {
    let assets = MemoryAssetStore::new();
    for file_id in ["base", "f1", "f2", "f3"] {
        for (page_id, blob) in svg_files(&["p1", "p2"]) {
            assets.put(file_id, &page_id, &blob).await.unwrap();
        }
    }
    assets
}

#[tokio::test]
async fn commit_uploads_then_replaces_document() {
    let designs = MemoryDesignStore::new().with_design("d1", hierarchy());
    let assets = MemoryAssetStore::new();
    let mut session = open(&designs).await;

    let file_id = session
        .add_leaf(
            &MenuPath::new(["A"]),
            "z",
            &["p1".to_string(), "p2".to_string()],
            svg_files(&["p1", "p2"]),
        )
        .unwrap();
    assert_eq!(designs.write_count(), 0);

    let report = session.commit(&designs, &assets).await.unwrap();
    assert_eq!(report.uploaded_files, vec![file_id.clone()]);
    assert_eq!(report.uploaded_blobs, 2);
    assert_eq!(designs.write_count(), 1);
    assert!(assets.exists(&file_id, "p1").await.unwrap());
    assert_eq!(designs.snapshot("d1").as_ref(), Some(session.canonical()));
    assert!(!session.is_dirty());
    assert!(session.pending().is_empty());
}

#[tokio::test]
async fn failed_document_write_keeps_working_copy_and_queue() {
    let designs = MemoryDesignStore::new().with_design("d1", hierarchy());
    let assets = MemoryAssetStore::new();
    let mut session = open(&designs).await;
    session
        .add_leaf(
            &MenuPath::new(["A"]),
            "z",
            &["p1".to_string()],
            svg_files(&["p1"]),
        )
        .unwrap();
    let working = session.working().clone();

    designs.set_fail_writes(true);
    let err = session.commit(&designs, &assets).await.unwrap_err();
    assert!(matches!(err, ApiError::Storage(StorageError::Unavailable(_))));
    assert_eq!(designs.snapshot("d1"), Some(hierarchy()));
    assert_eq!(session.working(), &working);
    assert_eq!(session.pending().len(), 1);

    designs.set_fail_writes(false);
    session.commit(&designs, &assets).await.unwrap();
    assert_eq!(designs.snapshot("d1"), Some(working));
}

#[tokio::test]
async fn failed_upload_leaves_document_untouched() {
    let designs = MemoryDesignStore::new().with_design("d1", hierarchy());
    let assets = MemoryAssetStore::new();
    let mut session = open(&designs).await;
    session
        .update_file(
            &MenuPath::new(["A", "x"]),
            &["p1".to_string()],
            svg_files(&["p1"]),
        )
        .unwrap();

    assets.set_fail_puts(true);
    assert!(session.commit(&designs, &assets).await.is_err());
    assert_eq!(designs.write_count(), 0);
    assert!(session.is_dirty());
}

#[tokio::test]
async fn commit_collects_files_no_longer_referenced() {
    let designs = MemoryDesignStore::new().with_design("d1", hierarchy());
    let assets = seeded_assets().await;
    let mut session = open(&designs).await;

    let removed = session.delete(&MenuPath::new(["A", "n"])).unwrap();
    assert_eq!(removed, vec!["f3".to_string()]);
    session
        .update_file(
            &MenuPath::new(["A", "x"]),
            &["p1".to_string(), "p2".to_string()],
            svg_files(&["p1", "p2"]),
        )
        .unwrap();

    let report = session.commit(&designs, &assets).await.unwrap();
    assert_eq!(report.deleted_files, vec!["f1".to_string(), "f3".to_string()]);
    assert_eq!(report.gc_failures, 0);
    assert_eq!(
        assets.file_ids(),
        vec![
            "base".to_string(),
            "f2".to_string(),
            "new-1".to_string()
        ]
    );
}

#[tokio::test]
async fn cleanup_failures_are_counted_not_returned() {
    let designs = MemoryDesignStore::new().with_design("d1", hierarchy());
    let assets = seeded_assets().await;
    let mut session = open(&designs).await;
    session.delete(&MenuPath::new(["A", "y"])).unwrap();

    assets.set_fail_deletes(true);
    let report = session.commit(&designs, &assets).await.unwrap();
    assert_eq!(report.gc_failures, 1);
    assert!(assets.exists("f2", "p1").await.unwrap());
    assert!(!session.is_dirty());
}

#[tokio::test]
async fn deleted_page_releases_its_assets() {
    let designs = MemoryDesignStore::new().with_design("d1", hierarchy());
    let assets = seeded_assets().await;
    let mut session = open(&designs).await;

    let orphaned = session.delete_page("back").unwrap();
    assert_eq!(orphaned.len(), 4);

    let report = session.commit(&designs, &assets).await.unwrap();
    assert_eq!(report.deleted_page_assets, 4);
    assert!(!assets.exists("f1", "p2").await.unwrap());
    assert!(assets.exists("f1", "p1").await.unwrap());
}

#[tokio::test]
async fn replaced_files_upload_under_new_ids() {
    let designs = MemoryDesignStore::new().with_design("d1", hierarchy());
    let assets = seeded_assets().await;
    let mut session = open(&designs).await;

    let mut replacements = BTreeMap::new();
    replacements.insert("f1".to_string(), svg_files(&["p1", "p2"]));
    let map = session.replace_files(replacements).unwrap();
    let new_id = map.get("f1").cloned().unwrap();

    let report = session.commit(&designs, &assets).await.unwrap();
    assert_eq!(report.uploaded_files, vec![new_id.clone()]);
    assert!(assets.exists(&new_id, "p2").await.unwrap());
    assert!(!assets.exists("f1", "p1").await.unwrap());
}

#[tokio::test]
async fn load_unknown_design() {
    let designs = MemoryDesignStore::new();
    let err = EditSession::load(&designs, "missing", "SHIRT", SessionConfig::default())
        .await
        .err();
    assert!(matches!(
        err,
        Some(ApiError::Storage(StorageError::DesignNotFound(_)))
    ));
}

#[tokio::test]
async fn undone_replacement_commits_the_original_upload() {
    let designs = MemoryDesignStore::new().with_design("d1", hierarchy());
    let assets = MemoryAssetStore::new();
    let mut session = open(&designs).await;

    let added = session
        .add_leaf(
            &MenuPath::new(["A"]),
            "z",
            &["p1".to_string()],
            svg_files(&["p1"]),
        )
        .unwrap();
    let mut replacements = BTreeMap::new();
    replacements.insert(added.clone(), svg_files(&["p1"]));
    let replaced = session.replace_files(replacements).unwrap();
    let new_id = replaced.get(&added).cloned().unwrap();
    session.undo().unwrap();

    let report = session.commit(&designs, &assets).await.unwrap();
    assert_eq!(report.uploaded_files, vec![added.clone()]);
    assert!(assets.exists(&added, "p1").await.unwrap());
    assert!(!assets.exists(&new_id, "p1").await.unwrap());
}

#[tokio::test]
async fn partial_base_replacement_is_rejected_before_commit() {
    let designs = MemoryDesignStore::new().with_design("d1", hierarchy());
    let assets = seeded_assets().await;
    let mut session = open(&designs).await;

    let mut replacements = BTreeMap::new();
    replacements.insert("base".to_string(), svg_files(&["p1"]));
    assert!(session.replace_files(replacements).is_err());

    session.commit(&designs, &assets).await.unwrap();
    assert!(assets.exists("base", "p1").await.unwrap());
    assert!(assets.exists("base", "p2").await.unwrap());
}
