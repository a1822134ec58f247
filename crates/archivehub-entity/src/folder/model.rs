//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use archivehub_core::types::{FolderId, UserId};

use crate::permission::PermissionSet;

/// A folder in the archive hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Full materialized path (e.g., `/contracts/2024`).
    pub path: String,
    /// Parent folder ID ([`FolderId::ROOT`] for top-level folders).
    pub parent_id: FolderId,
    /// Labels required to see this folder and, by inheritance, everything
    /// created inside it.
    pub group_permission: PermissionSet,
    /// User who created the folder.
    pub creator_id: UserId,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a top-level folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_root()
    }
}

/// Data required to insert a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Full materialized path.
    pub path: String,
    /// Parent folder ([`FolderId::ROOT`] for top-level).
    pub parent_id: FolderId,
    /// Effective permission, already resolved by inheritance.
    pub group_permission: PermissionSet,
    /// Creator.
    pub creator_id: UserId,
}
