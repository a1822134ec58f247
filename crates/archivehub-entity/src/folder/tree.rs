//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use super::model::Folder;
use crate::archive::Archive;

/// A folder together with its visible sub-folders and records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// The folder itself.
    #[serde(flatten)]
    pub folder: Folder,
    /// Visible child folders.
    pub children: Vec<TreeNode>,
    /// Visible records directly inside this folder.
    pub records: Vec<Archive>,
}

impl TreeNode {
    /// Create a leaf node.
    pub fn new(folder: Folder, records: Vec<Archive>) -> Self {
        Self {
            folder,
            children: Vec::new(),
            records,
        }
    }

    /// Number of folders in this subtree, including this one.
    pub fn folder_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::folder_count).sum::<usize>()
    }

    /// Number of records in this subtree.
    pub fn record_count(&self) -> usize {
        self.records.len() + self.children.iter().map(TreeNode::record_count).sum::<usize>()
    }
}

