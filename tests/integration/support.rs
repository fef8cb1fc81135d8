use design_tree::upload::{Blob, FileSet};
use design_tree::{ComponentsTree, Hierarchy};
use serde_json::json;

/// Tree `{A: {selectedOption: "x", options: {x: f1, y: f2}}}`
pub fn scenario_tree() -> ComponentsTree {
    serde_json::from_value(json!({
        "A": {
            "selectedOption": "x",
            "options": { "x": { "fileId": "f1" }, "y": { "fileId": "f2" } }
        }
    }))
    .unwrap()
}

/// One design with a two-page SHIRT category and an empty HOODIE bucket
pub fn hierarchy() -> Hierarchy {
    serde_json::from_value(json!({
        "categoryMapping": { "SHIRT": "uuid-1", "HOODIE": "uuid-2" },
        "categories": {
            "SHIRT": {
                "pages": { "front": "p1", "back": "p2" },
                "baseDrawing": { "fileId": "base" },
                "components": {
                    "A": {
                        "selectedOption": "x",
                        "options": {
                            "x": { "fileId": "f1" },
                            "y": { "fileId": "f2" },
                            "n": {
                                "selectedOption": "deep",
                                "options": {
                                    "deep": { "options": { "d1": { "fileId": "f3" } } }
                                }
                            }
                        }
                    }
                }
            }
        }
    }))
    .unwrap()
}

pub fn svg_files(pages: &[&str]) -> FileSet {
    pages
        .iter()
        .map(|page| (page.to_string(), Blob::svg(format!("<svg id=\"{}\"/>", page))))
        .collect()
}
