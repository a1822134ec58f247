//! Archive record operations with permission inheritance and checks.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use archivehub_core::config::ArchiveConfig;
use archivehub_core::error::AppError;
use archivehub_core::result::AppResult;
use archivehub_core::types::{ArchiveId, FolderId, PageRequest, PageResponse};
use archivehub_database::store::{ArchiveStore, FolderStore};
use archivehub_entity::archive::{Archive, ArchiveFilter, CreateArchive, UpdateArchive};
use archivehub_entity::folder::Folder;

use crate::context::OperationContext;
use crate::validation::{not_blank, validate_request};

/// Request to create an archive record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateArchiveRequest {
    /// Document number. Generated from the archive type when blank.
    pub file_no: String,
    /// Title.
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    /// Contract number.
    #[validate(custom(function = "not_blank"))]
    pub contract_no: String,
    /// Institution number.
    pub inst_no: String,
    /// Archive type.
    pub arc_type: String,
    /// Owning folder. Must not be the root.
    pub folder_id: FolderId,
    /// Storage date.
    pub storage_date: Option<NaiveDate>,
}

/// Manages archive records.
#[derive(Debug, Clone)]
pub struct ArchiveService {
    archives: Arc<dyn ArchiveStore>,
    folders: Arc<dyn FolderStore>,
    config: ArchiveConfig,
}

impl ArchiveService {
    /// Creates a new archive service.
    pub fn new(
        archives: Arc<dyn ArchiveStore>,
        folders: Arc<dyn FolderStore>,
        config: ArchiveConfig,
    ) -> Self {
        Self {
            archives,
            folders,
            config,
        }
    }

    /// Gets a record by id, if the caller may see it.
    pub async fn get(&self, ctx: &OperationContext, id: ArchiveId) -> AppResult<Archive> {
        let archive = ctx
            .guard(self.archives.find_by_id(id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Archive {id} not found")))?;
        require_visible(ctx, &archive)?;
        Ok(archive)
    }

    /// Gets a record by contract number, if the caller may see it.
    pub async fn get_by_contract_no(
        &self,
        ctx: &OperationContext,
        contract_no: &str,
    ) -> AppResult<Archive> {
        let archive = ctx
            .guard(self.archives.find_by_contract_no(contract_no))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Archive '{contract_no}' not found")))?;
        require_visible(ctx, &archive)?;
        Ok(archive)
    }

    /// Lists the records in a folder that the caller may see.
    pub async fn list_by_folder(
        &self,
        ctx: &OperationContext,
        folder_id: FolderId,
    ) -> AppResult<Vec<Archive>> {
        ctx.guard(self.archives.list_by_folder(folder_id, Some(&ctx.permission)))
            .await
    }

    /// Filtered, paginated listing scoped to the caller's labels.
    ///
    /// Missing or non-positive paging values fall back to the first page
    /// and the configured default size.
    pub async fn list(
        &self,
        ctx: &OperationContext,
        filter: &ArchiveFilter,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> AppResult<PageResponse<Archive>> {
        let page = PageRequest::from_raw(
            page,
            page_size,
            self.config.default_page_size,
            self.config.max_page_size,
        );
        ctx.guard(self.archives.search(&ctx.permission, filter, &page))
            .await
    }

    /// Creates a record inside a folder, copying the folder's labels.
    pub async fn create(
        &self,
        ctx: &OperationContext,
        req: CreateArchiveRequest,
    ) -> AppResult<Archive> {
        validate_request(&req)?;
        let folder = self.owning_folder(ctx, req.folder_id).await?;

        let file_no = match req.file_no.trim() {
            "" => self.generate_sequence_number(ctx, req.arc_type.trim()).await?,
            given => given.to_string(),
        };
        let data = inherit(&folder, req, file_no, ctx);

        let archive = ctx.guard(self.archives.create(&data)).await?;

        info!(
            operator_id = %ctx.operator_id,
            archive_id = %archive.id,
            contract_no = %archive.contract_no,
            folder_id = %archive.folder_id,
            permission = %archive.group_permission,
            "Archive created"
        );
        Ok(archive)
    }

    /// Changes descriptive fields of a record the caller may see.
    ///
    /// Borrow state, folder and labels cannot be changed this way.
    pub async fn update_fields(
        &self,
        ctx: &OperationContext,
        id: ArchiveId,
        changes: UpdateArchive,
    ) -> AppResult<Archive> {
        let existing = self.get(ctx, id).await?;
        let changes = trim_changes(changes);

        for (field, value) in [("title", &changes.title), ("contract_no", &changes.contract_no)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(AppError::validation(format!("{field} must not be blank")));
            }
        }
        if changes.is_empty() {
            return Ok(existing);
        }

        let updated = ctx
            .guard(self.archives.update_fields(id, &changes))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Archive {id} not found")))?;

        info!(
            operator_id = %ctx.operator_id,
            archive_id = %id,
            "Archive fields updated"
        );
        Ok(updated)
    }

    /// Next document number for an archive type: the count of existing
    /// records of that type plus one.
    ///
    /// Two concurrent callers can receive the same number.
    pub async fn generate_sequence_number(
        &self,
        ctx: &OperationContext,
        arc_type: &str,
    ) -> AppResult<String> {
        let count = ctx.guard(self.archives.count_by_arc_type(arc_type)).await?;
        Ok((count + 1).to_string())
    }

    /// Resolves the folder a new record goes into.
    pub(crate) async fn owning_folder(
        &self,
        ctx: &OperationContext,
        folder_id: FolderId,
    ) -> AppResult<Folder> {
        if folder_id.is_root() {
            return Err(AppError::validation("Archive must belong to a folder"));
        }
        ctx.guard(self.folders.find_by_id(folder_id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("folder {folder_id} not found")))
    }

    pub(crate) fn store(&self) -> &Arc<dyn ArchiveStore> {
        &self.archives
    }
}

/// Build the insert for a validated request, taking labels from `folder`.
pub(crate) fn inherit(
    folder: &Folder,
    req: CreateArchiveRequest,
    file_no: String,
    ctx: &OperationContext,
) -> CreateArchive {
    CreateArchive {
        file_no,
        title: req.title.trim().to_string(),
        contract_no: req.contract_no.trim().to_string(),
        inst_no: req.inst_no.trim().to_string(),
        arc_type: req.arc_type.trim().to_string(),
        folder_id: folder.id,
        creator_id: ctx.operator_id,
        group_permission: folder.group_permission.clone(),
        storage_date: req.storage_date,
    }
}

/// Trim every text change the way [`inherit`] trims a new record.
fn trim_changes(changes: UpdateArchive) -> UpdateArchive {
    let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
    UpdateArchive {
        file_no: trim(changes.file_no),
        title: trim(changes.title),
        contract_no: trim(changes.contract_no),
        inst_no: trim(changes.inst_no),
        arc_type: trim(changes.arc_type),
        storage_date: changes.storage_date,
    }
}

fn require_visible(ctx: &OperationContext, archive: &Archive) -> AppResult<()> {
    if archive.group_permission.is_satisfied_by(&ctx.permission) {
        Ok(())
    } else {
        Err(AppError::authorization(format!(
            "Archive '{}' requires labels '{}'",
            archive.contract_no, archive.group_permission
        )))
    }
}
