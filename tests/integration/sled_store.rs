use super::support::{hierarchy, svg_files};
use design_tree::config::SessionConfig;
use design_tree::store::{open_database, AssetStore, DesignStore, SledAssetStore, SledDesignStore};
use design_tree::upload::Blob;
use design_tree::{EditSession, MenuPath, StorageError};
use tempfile::TempDir;

fn stores(dir: &TempDir) -> (SledDesignStore, SledAssetStore) {
    let db = open_database(dir.path()).unwrap();
    (
        SledDesignStore::new(&db).unwrap(),
        SledAssetStore::new(&db).unwrap(),
    )
}

#[tokio::test]
async fn design_documents_round_trip() {
    let dir = TempDir::new().unwrap();
    let (designs, _) = stores(&dir);

    assert_eq!(designs.load("d1").await.unwrap(), None);
    designs.replace("d1", &hierarchy()).await.unwrap();
    designs.replace("d2", &hierarchy()).await.unwrap();

    assert_eq!(designs.load("d1").await.unwrap(), Some(hierarchy()));
    assert_eq!(
        designs.list().await.unwrap(),
        vec!["d1".to_string(), "d2".to_string()]
    );
}

#[tokio::test]
async fn assets_are_keyed_per_file_and_page() {
    let dir = TempDir::new().unwrap();
    let (_, assets) = stores(&dir);
    let blob = Blob::svg("<svg/>");

    let record = assets.put("f1", "p1", &blob).await.unwrap();
    assert_eq!(record.digest, blob.digest());
    assert_eq!(record.size, blob.len() as u64);
    assets.put("f1", "p2", &blob).await.unwrap();
    assets.put("f10", "p1", &blob).await.unwrap();

    assert_eq!(assets.get("f1", "p2").await.unwrap(), Some(blob.clone()));
    assert!(assets.record("f1", "p1").unwrap().is_some());

    // "f1" must not match "f10" by prefix
    assert_eq!(assets.delete_file("f1").await.unwrap(), 2);
    assert!(!assets.exists("f1", "p1").await.unwrap());
    assert!(assets.exists("f10", "p1").await.unwrap());

    assert!(assets.delete_asset("f10", "p1").await.unwrap());
    assert!(!assets.delete_asset("f10", "p1").await.unwrap());
}

#[tokio::test]
async fn session_commits_through_sled() {
    let dir = TempDir::new().unwrap();
    let (designs, assets) = stores(&dir);
    designs.replace("d1", &hierarchy()).await.unwrap();

    let mut session = EditSession::load(&designs, "d1", "SHIRT", SessionConfig::default())
        .await
        .unwrap();
    let file_id = session
        .add_leaf(
            &MenuPath::new(["A"]),
            "z",
            &["p1".to_string()],
            svg_files(&["p1"]),
        )
        .unwrap();
    session.commit(&designs, &assets).await.unwrap();

    let stored = designs.load("d1").await.unwrap().unwrap();
    assert_eq!(&stored, session.canonical());
    assert!(assets.exists(&file_id, "p1").await.unwrap());
}

#[test]
fn missing_design_error_names_the_id() {
    let err = StorageError::DesignNotFound("d9".to_string());
    assert!(err.to_string().contains("d9"));
}
