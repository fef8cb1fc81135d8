use super::support::{scenario_tree, svg_files};
use design_tree::ids::SequenceMinter;
use design_tree::ops::{add_leaf, rename};
use design_tree::remap::FileUpdateMap;
use design_tree::tree::resolve;
use design_tree::MenuPath;

fn file_id_at(tree: &design_tree::ComponentsTree, keys: &[&str]) -> Option<String> {
    resolve(tree, &MenuPath::new(keys.iter().copied()))
        .ok()
        .and_then(|node| node.file_id().map(str::to_string))
}

#[test]
fn add_leaf_mints_fresh_id_and_keeps_siblings() {
    let tree = scenario_tree();
    let minter = SequenceMinter::new("gen");
    let added = add_leaf(
        &tree,
        &MenuPath::new(["A"]),
        "z",
        &["p1".to_string()],
        &svg_files(&["p1"]),
        &minter,
    )
    .unwrap();

    assert_eq!(added.file_id, "gen-1");
    assert_eq!(file_id_at(&added.tree, &["A", "z"]), Some("gen-1".to_string()));
    assert_eq!(file_id_at(&added.tree, &["A", "x"]), Some("f1".to_string()));
    assert_eq!(file_id_at(&added.tree, &["A", "y"]), Some("f2".to_string()));
    assert_eq!(tree, scenario_tree());
}

#[test]
fn rename_moves_value_under_new_key() {
    let tree = scenario_tree();
    let renamed = rename(&tree, &MenuPath::new(["A", "x"]), "x2").unwrap();

    let before = resolve(&tree, &MenuPath::new(["A", "x"])).unwrap();
    let after = resolve(&renamed, &MenuPath::new(["A", "x2"])).unwrap();
    assert_eq!(before, after);
    assert!(resolve(&renamed, &MenuPath::new(["A", "x"])).is_err());
    assert_eq!(file_id_at(&renamed, &["A", "y"]), Some("f2".to_string()));
}

#[test]
fn remap_rewrites_only_mapped_leaves() {
    let tree = scenario_tree();
    let map: FileUpdateMap = [("f1".to_string(), "f1new".to_string())]
        .into_iter()
        .collect();
    let remapped = map.apply_to_tree(&tree);

    assert_eq!(file_id_at(&remapped, &["A", "x"]), Some("f1new".to_string()));
    assert_eq!(file_id_at(&remapped, &["A", "y"]), Some("f2".to_string()));
    assert_eq!(tree, scenario_tree());
}
