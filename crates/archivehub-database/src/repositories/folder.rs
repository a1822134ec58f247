//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use archivehub_core::error::{AppError, ErrorKind};
use archivehub_core::result::AppResult;
use archivehub_core::types::FolderId;
use archivehub_entity::folder::{CreateFolder, Folder};
use archivehub_entity::permission::PermissionSet;

use super::permission_predicate;
use crate::store::FolderStore;

/// PostgreSQL folder store.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn list_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id = $1 ORDER BY id ASC")
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    async fn list_children_visible(
        &self,
        parent_id: FolderId,
        permission: &PermissionSet,
    ) -> AppResult<Vec<Folder>> {
        let sql = format!(
            "SELECT * FROM folders WHERE parent_id = $1 AND {} ORDER BY id ASC",
            permission_predicate("group_permission", 2)
        );
        sqlx::query_as::<_, Folder>(&sql)
            .bind(parent_id)
            .bind(permission.labels().to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list visible children", e)
            })
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (name, path, parent_id, group_permission, creator_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.path)
        .bind(data.parent_id)
        .bind(&data.group_permission)
        .bind(data.creator_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))
    }
}
