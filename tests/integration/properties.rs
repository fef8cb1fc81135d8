use design_tree::ids::SequenceMinter;
use design_tree::ops::{add_leaf, add_parent, delete, rename, select_option, update_leaf};
use design_tree::remap::{build_update_map, remap_files};
use design_tree::tree::{walk_tree, AttributeNode, FileRef, Visitor};
use design_tree::types::FileId;
use design_tree::upload::{Blob, FileSet};
use design_tree::{
    shift_category, Category, ComponentsTree, Hierarchy, MenuPath, OptionNode, Selection, TreeError,
};
use proptest::prelude::*;
use proptest::test_runner::Config;
use std::collections::BTreeMap;

fn node_strategy() -> impl Strategy<Value = OptionNode> {
    let leaf = "f[a-z0-9]{1,4}".prop_map(OptionNode::leaf);
    leaf.prop_recursive(4, 48, 4, |inner| {
        prop::collection::btree_map("[a-e]{1,2}", inner, 1..4).prop_map(|options| {
            OptionNode::Parent(AttributeNode {
                selected_option: Selection::default(),
                options,
            })
        })
    })
}

fn tree_strategy() -> impl Strategy<Value = ComponentsTree> {
    prop::collection::btree_map("[A-D]", node_strategy(), 1..4)
        .prop_map(|entries| ComponentsTree { entries })
}

#[derive(Default)]
struct Leaves(Vec<(String, FileId)>);

impl Visitor for Leaves {
    fn visit_leaf(&mut self, path: &MenuPath, file: &FileRef) {
        self.0.push((path.to_string(), file.file_id.clone()));
    }
}

fn leaves(tree: &ComponentsTree) -> Vec<(String, FileId)> {
    let mut collected = Leaves::default();
    walk_tree(&mut collected, tree);
    collected.0
}

fn count_leaves(node: &OptionNode) -> usize {
    match node {
        OptionNode::Leaf(_) => 1,
        OptionNode::Parent(attr) => attr.options.values().map(count_leaves).sum(),
    }
}

fn one_page() -> FileSet {
    [("p1".to_string(), Blob::svg("<svg/>"))].into_iter().collect()
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn remap_skips_empty_sets_and_rewrites_the_rest(
        tree in tree_strategy(),
        flags in prop::collection::vec(any::<bool>(), 16)
    ) {
        let mut replacements: BTreeMap<FileId, FileSet> = BTreeMap::new();
        for (i, (_, file_id)) in leaves(&tree).into_iter().enumerate() {
            let files = if flags[i % flags.len()] { one_page() } else { FileSet::new() };
            replacements.insert(file_id, files);
        }

        let minter = SequenceMinter::new("new");
        let outcome = remap_files(&tree, replacements.clone(), &minter);
        for (old, files) in &replacements {
            prop_assert_eq!(outcome.map.contains(old), !files.is_empty());
        }

        let before = leaves(&tree);
        let after = leaves(&outcome.tree);
        prop_assert_eq!(before.len(), after.len());
        for ((path, old), (new_path, new)) in before.iter().zip(after.iter()) {
            prop_assert_eq!(path, new_path);
            match outcome.map.get(old) {
                Some(mapped) => prop_assert_eq!(new, mapped),
                None => prop_assert_eq!(new, old),
            }
        }
        prop_assert_eq!(outcome.uploads.len(), outcome.map.len());
    }

    #[test]
    fn update_map_never_contains_empty_replacements(
        ids in prop::collection::btree_set("f[0-9]{1,3}", 0..12)
    ) {
        let replacements: BTreeMap<FileId, FileSet> =
            ids.iter().map(|id| (id.clone(), FileSet::new())).collect();
        let map = build_update_map(&replacements, &SequenceMinter::new("new"));
        prop_assert!(map.is_empty());
    }

    #[test]
    fn operations_never_mutate_their_input(tree in tree_strategy()) {
        let before = serde_json::to_string(&tree).unwrap();
        let first = tree.entries.keys().next().cloned().unwrap();
        let path = MenuPath::new([first.as_str()]);
        let minter = SequenceMinter::new("new");

        let _ = rename(&tree, &path, "renamed");
        let _ = delete(&tree, &path);
        let _ = add_parent(&tree, &MenuPath::root(), "Z");
        let _ = add_parent(&tree, &path, "zz");
        let _ = add_leaf(&tree, &path, "zz", &["p1".to_string()], &one_page(), &minter);
        let _ = select_option(&tree, &path, Selection::Disabled);
        let _ = update_leaf(&tree, &path, "replaced".to_string());
        if let Some((leaf_path, _)) = leaves(&tree).first() {
            let keys: Vec<&str> = leaf_path.split('/').collect();
            let _ = update_leaf(&tree, &MenuPath::new(keys), "replaced".to_string());
        }
        let replacements: BTreeMap<FileId, FileSet> = leaves(&tree)
            .into_iter()
            .map(|(_, file_id)| (file_id, one_page()))
            .collect();
        let _ = remap_files(&tree, replacements, &minter);

        prop_assert_eq!(serde_json::to_string(&tree).unwrap(), before);
    }

    #[test]
    fn shift_category_never_mutates_its_input(tree in tree_strategy()) {
        let mut hierarchy = Hierarchy::new();
        hierarchy.category_mapping.insert("SHIRT".to_string(), "uuid-1".to_string());
        hierarchy.category_mapping.insert("HOODIE".to_string(), "uuid-2".to_string());
        let mut category = Category::new();
        category.pages.insert("front".to_string(), "p1".to_string());
        category.components = tree;
        hierarchy.categories.insert("SHIRT".to_string(), category);
        let before = serde_json::to_string(&hierarchy).unwrap();

        let shifted = shift_category(&hierarchy, "SHIRT", "HOODIE").unwrap();
        prop_assert_eq!(serde_json::to_string(&hierarchy).unwrap(), before);
        prop_assert_eq!(shifted.categories.get("HOODIE"), hierarchy.categories.get("SHIRT"));
    }

    #[test]
    fn duplicate_names_are_rejected(tree in tree_strategy()) {
        let minter = SequenceMinter::new("new");
        for name in tree.entries.keys() {
            prop_assert_eq!(
                add_parent(&tree, &MenuPath::root(), name),
                Err(TreeError::DuplicateName(name.clone()))
            );
        }
        for (key, node) in &tree.entries {
            if let OptionNode::Parent(attr) = node {
                let parent = MenuPath::new([key.as_str()]);
                for name in attr.options.keys() {
                    let err = add_leaf(&tree, &parent, name, &["p1".to_string()], &one_page(), &minter)
                        .err();
                    prop_assert_eq!(err, Some(TreeError::DuplicateName(name.clone())));
                }
            }
        }
    }

    #[test]
    fn delete_collects_every_nested_leaf(tree in tree_strategy()) {
        for (key, node) in &tree.entries {
            let deleted = delete(&tree, &MenuPath::new([key.as_str()])).unwrap();
            prop_assert_eq!(deleted.removed_file_ids.len(), count_leaves(node));
            prop_assert!(deleted.tree.get(key).is_none());
        }
    }
}
