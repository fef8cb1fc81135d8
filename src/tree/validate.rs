//! Structural invariant checks for component trees.

use crate::tree::node::{AttributeNode, ComponentsTree, Selection};
use crate::tree::path::MenuPath;
use crate::tree::visit::{walk_tree, Visitor};
use serde::Serialize;

/// A `selectedOption` that names no key of its `options`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingSelection {
    pub path: MenuPath,
    pub selected: String,
}

#[derive(Default)]
struct SelectionChecker {
    dangling: Vec<DanglingSelection>,
}

impl Visitor for SelectionChecker {
    fn visit_parent(&mut self, path: &MenuPath, attr: &AttributeNode) {
        if let Selection::Option(name) = &attr.selected_option {
            if !attr.options.contains_key(name) {
                self.dangling.push(DanglingSelection {
                    path: path.clone(),
                    selected: name.clone(),
                });
            }
        }
    }
}

/// Every attribute whose selection points at a missing option.
///
/// Renames leave selections untouched, so this is how callers find
/// selections made stale by a rename or delete.
pub fn dangling_selections(tree: &ComponentsTree) -> Vec<DanglingSelection> {
    let mut checker = SelectionChecker::default();
    walk_tree(&mut checker, tree);
    checker.dangling
}

/// Validation report for a tree
#[derive(Debug, Clone, Serialize)]
pub struct TreeReport {
    pub dangling: Vec<DanglingSelection>,
}

impl TreeReport {
    pub fn is_valid(&self) -> bool {
        self.dangling.is_empty()
    }
}

pub fn validate(tree: &ComponentsTree) -> TreeReport {
    TreeReport {
        dangling: dangling_selections(tree),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dangling_selection_detected() {
        let tree: ComponentsTree = serde_json::from_value(json!({
            "A": { "selectedOption": "gone", "options": { "x": { "fileId": "f1" } } },
            "B": { "selectedOption": "none", "options": {} },
            "C": { "selectedOption": " ", "options": {} },
            "D": { "selectedOption": "y", "options": { "y": { "fileId": "f2" } } }
        }))
        .unwrap();

        let report = validate(&tree);
        assert!(!report.is_valid());
        assert_eq!(
            report.dangling,
            vec![DanglingSelection {
                path: MenuPath::new(["A"]),
                selected: "gone".to_string(),
            }]
        );
    }
}
