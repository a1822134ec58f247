//! Folder creation with permission inheritance.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use archivehub_core::error::AppError;
use archivehub_core::result::AppResult;
use archivehub_core::types::FolderId;
use archivehub_database::store::FolderStore;
use archivehub_entity::folder::{CreateFolder, Folder};
use archivehub_entity::permission::PermissionSet;

use crate::context::OperationContext;
use crate::validation::{not_blank, validate_request};

/// Request to create a folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    /// Explicit path. Derived from the parent path and name when absent.
    pub path: Option<String>,
    /// Parent folder, or [`FolderId::ROOT`].
    pub parent_id: FolderId,
    /// Labels for a top-level folder. Ignored under a parent, whose labels
    /// are inherited instead.
    pub root_permission: PermissionSet,
}

/// Manages folders.
#[derive(Debug, Clone)]
pub struct FolderService {
    folders: Arc<dyn FolderStore>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folders: Arc<dyn FolderStore>) -> Self {
        Self { folders }
    }

    /// Gets a folder the caller is allowed to see.
    pub async fn get_folder(&self, ctx: &OperationContext, folder_id: FolderId) -> AppResult<Folder> {
        let folder = ctx
            .guard(self.folders.find_by_id(folder_id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;

        if !folder.group_permission.is_satisfied_by(&ctx.permission) {
            return Err(AppError::authorization(format!(
                "Folder {folder_id} requires labels '{}'",
                folder.group_permission
            )));
        }
        Ok(folder)
    }

    /// Lists the direct children of a folder the caller may see.
    pub async fn list_children(
        &self,
        ctx: &OperationContext,
        parent_id: FolderId,
    ) -> AppResult<Vec<Folder>> {
        ctx.guard(self.folders.list_children_visible(parent_id, &ctx.permission))
            .await
    }

    /// Creates a folder.
    ///
    /// Under a parent the new folder takes the parent's labels whatever the
    /// request says; at the top level it takes `root_permission`.
    pub async fn create_folder(
        &self,
        ctx: &OperationContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        validate_request(&req)?;
        let name = req.name.trim().to_string();

        let (group_permission, parent_path) = if req.parent_id.is_root() {
            (req.root_permission, String::new())
        } else {
            let parent = ctx
                .guard(self.folders.find_by_id(req.parent_id))
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("parent folder {} not found", req.parent_id))
                })?;
            (parent.group_permission, parent.path)
        };

        let path = match req.path.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => format!("{}/{}", parent_path.trim_end_matches('/'), name),
        };

        let folder = ctx
            .guard(self.folders.create(&CreateFolder {
                name,
                path,
                parent_id: req.parent_id,
                group_permission,
                creator_id: ctx.operator_id,
            }))
            .await?;

        info!(
            operator_id = %ctx.operator_id,
            folder_id = %folder.id,
            parent_id = %folder.parent_id,
            path = %folder.path,
            permission = %folder.group_permission,
            "Folder created"
        );

        Ok(folder)
    }
}
