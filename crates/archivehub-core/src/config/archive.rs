//! Archive listing, tree traversal, and import settings.

use serde::{Deserialize, Serialize};

/// Archive behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Page size used when a list request gives none (or a non-positive one).
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound on page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    /// Maximum folder depth the tree assembler descends.
    #[serde(default = "default_tree_max_depth")]
    pub tree_max_depth: usize,
    /// Tabular import settings.
    #[serde(default)]
    pub import: ImportConfig,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            tree_max_depth: default_tree_max_depth(),
            import: ImportConfig::default(),
        }
    }
}

/// Tabular import configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Minimum number of columns a data row must carry.
    #[serde(default = "default_min_columns")]
    pub min_columns: usize,
    /// Insert the valid rows even when some rows were rejected.
    ///
    /// When `false` (the default) a single rejected row means nothing is
    /// inserted.
    #[serde(default)]
    pub skip_invalid_rows: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            min_columns: default_min_columns(),
            skip_invalid_rows: false,
        }
    }
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    100
}

fn default_tree_max_depth() -> usize {
    64
}

fn default_min_columns() -> usize {
    5
}
