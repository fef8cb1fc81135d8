//! Component tree node types
//!
//! The serialized shape is the nested key/value document stored in a
//! category's `components` field:
//!
//! ```json
//! { "color": { "selectedOption": "red",
//!              "options": { "red": { "fileId": "f1" },
//!                           "blue": { "fileId": "f2" } } },
//!   "logo": { "fileId": "f3" } }
//! ```

use crate::types::FileId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Serialized marker for an attribute with no option chosen yet
pub const UNSET_SELECTION: &str = " ";

/// Serialized marker for a disabled attribute
pub const DISABLED_SELECTION: &str = "none";

/// Reference to one uploaded asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileRef {
    pub file_id: FileId,
}

impl FileRef {
    pub fn new(file_id: impl Into<FileId>) -> Self {
        Self {
            file_id: file_id.into(),
        }
    }
}

/// Currently active option of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    Unset,
    Disabled,
    Option(String),
}

impl Selection {
    /// Option name this selection points at, if any
    pub fn option(&self) -> Option<&str> {
        match self {
            Selection::Option(name) => Some(name),
            _ => None,
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Unset
    }
}

impl From<String> for Selection {
    fn from(raw: String) -> Self {
        if raw.trim().is_empty() {
            Selection::Unset
        } else if raw == DISABLED_SELECTION {
            Selection::Disabled
        } else {
            Selection::Option(raw)
        }
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::Unset => UNSET_SELECTION.to_string(),
            Selection::Disabled => DISABLED_SELECTION.to_string(),
            Selection::Option(name) => name,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Unset => write!(f, "(unset)"),
            Selection::Disabled => write!(f, "(disabled)"),
            Selection::Option(name) => write!(f, "{}", name),
        }
    }
}

/// Customizable attribute: a selection plus named child options
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AttributeNode {
    #[serde(default)]
    pub selected_option: Selection,
    #[serde(default)]
    pub options: BTreeMap<String, OptionNode>,
}

impl AttributeNode {
    /// Empty attribute with an unset selection
    pub fn new() -> Self {
        Self::default()
    }
}

/// One option of an attribute: either a file leaf or a nested attribute
///
/// Both variants deny unknown fields, so a document node carrying `fileId`
/// and `options` at once fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionNode {
    Leaf(FileRef),
    Parent(AttributeNode),
}

impl OptionNode {
    pub fn leaf(file_id: impl Into<FileId>) -> Self {
        OptionNode::Leaf(FileRef::new(file_id))
    }

    pub fn parent() -> Self {
        OptionNode::Parent(AttributeNode::new())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, OptionNode::Leaf(_))
    }

    pub fn file_id(&self) -> Option<&str> {
        match self {
            OptionNode::Leaf(file) => Some(&file.file_id),
            OptionNode::Parent(_) => None,
        }
    }

    pub fn options(&self) -> Option<&BTreeMap<String, OptionNode>> {
        match self {
            OptionNode::Leaf(_) => None,
            OptionNode::Parent(attr) => Some(&attr.options),
        }
    }

    pub fn options_mut(&mut self) -> Option<&mut BTreeMap<String, OptionNode>> {
        match self {
            OptionNode::Leaf(_) => None,
            OptionNode::Parent(attr) => Some(&mut attr.options),
        }
    }
}

/// Full customization surface of one category
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentsTree {
    pub entries: BTreeMap<String, OptionNode>,
}

impl ComponentsTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&OptionNode> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, node: OptionNode) -> Option<OptionNode> {
        self.entries.insert(key.into(), node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
