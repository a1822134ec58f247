//! Archive record repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use archivehub_core::error::{AppError, ErrorKind};
use archivehub_core::result::AppResult;
use archivehub_core::types::{ArchiveId, FolderId, PageRequest, PageResponse};
use archivehub_entity::archive::{Archive, ArchiveFilter, CreateArchive, UpdateArchive};
use archivehub_entity::audit::{AuditRecord, CreateAuditRecord};
use archivehub_entity::permission::PermissionSet;

use super::permission_predicate;
use crate::store::ArchiveStore;

const CONTRACT_NO_KEY: &str = "archives_contract_no_key";

const INSERT_ARCHIVE: &str = "INSERT INTO archives \
     (file_no, title, contract_no, inst_no, arc_type, folder_id, creator_id, group_permission, storage_date) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *";

/// PostgreSQL archive store.
#[derive(Debug, Clone)]
pub struct ArchiveRepository {
    pool: PgPool,
}

impl ArchiveRepository {
    /// Create a new archive repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map an insert/update failure, turning a duplicate contract number into
/// a conflict.
fn map_write_error(e: sqlx::Error, contract_no: &str, context: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(CONTRACT_NO_KEY) => {
            AppError::conflict(format!("Contract number '{contract_no}' already exists"))
        }
        _ => AppError::with_source(ErrorKind::Database, context.to_string(), e),
    }
}

#[async_trait]
impl ArchiveStore for ArchiveRepository {
    async fn find_by_id(&self, id: ArchiveId) -> AppResult<Option<Archive>> {
        sqlx::query_as::<_, Archive>("SELECT * FROM archives WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find archive", e))
    }

    async fn find_by_contract_no(&self, contract_no: &str) -> AppResult<Option<Archive>> {
        sqlx::query_as::<_, Archive>("SELECT * FROM archives WHERE contract_no = $1")
            .bind(contract_no)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to find archive by contract number",
                    e,
                )
            })
    }

    async fn list_by_folder(
        &self,
        folder_id: FolderId,
        permission: Option<&PermissionSet>,
    ) -> AppResult<Vec<Archive>> {
        let result = match permission {
            Some(permission) => {
                let sql = format!(
                    "SELECT * FROM archives WHERE folder_id = $1 AND {} ORDER BY id ASC",
                    permission_predicate("group_permission", 2)
                );
                sqlx::query_as::<_, Archive>(&sql)
                    .bind(folder_id)
                    .bind(permission.labels().to_vec())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query_as::<_, Archive>(
                    "SELECT * FROM archives WHERE folder_id = $1 ORDER BY id ASC",
                )
                .bind(folder_id)
                .fetch_all(&self.pool)
                .await
            }
        };
        result.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list folder archives", e)
        })
    }

    async fn search(
        &self,
        permission: &PermissionSet,
        filter: &ArchiveFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Archive>> {
        let mut conditions = vec![permission_predicate("group_permission", 1)];
        let mut param_idx = 2u32;

        if filter.contract_no.is_some() {
            conditions.push(format!("strpos(contract_no, ${param_idx}) > 0"));
            param_idx += 1;
        }
        if filter.arc_type.is_some() {
            conditions.push(format!("arc_type = ${param_idx}"));
            param_idx += 1;
        }
        if filter.inst_no.is_some() {
            conditions.push(format!("inst_no = ${param_idx}"));
            param_idx += 1;
        }
        if filter.borrow_state.is_some() {
            conditions.push(format!("borrow_state = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));
        let count_sql = format!("SELECT COUNT(*) FROM archives {where_clause}");
        let select_sql = format!(
            "SELECT * FROM archives {where_clause} ORDER BY id ASC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );
        debug!(sql = %select_sql, "Searching archives");

        let labels = permission.labels().to_vec();
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(labels.clone());
        let mut select_query = sqlx::query_as::<_, Archive>(&select_sql).bind(labels);

        if let Some(c) = &filter.contract_no {
            count_query = count_query.bind(c.clone());
            select_query = select_query.bind(c.clone());
        }
        if let Some(t) = &filter.arc_type {
            count_query = count_query.bind(t.clone());
            select_query = select_query.bind(t.clone());
        }
        if let Some(i) = &filter.inst_no {
            count_query = count_query.bind(i.clone());
            select_query = select_query.bind(i.clone());
        }
        if let Some(s) = filter.borrow_state {
            count_query = count_query.bind(s);
            select_query = select_query.bind(s);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count archives", e)
        })?;

        let archives = select_query
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search archives", e))?;

        Ok(PageResponse::new(archives, page, total as u64))
    }

    async fn create(&self, data: &CreateArchive) -> AppResult<Archive> {
        sqlx::query_as::<_, Archive>(INSERT_ARCHIVE)
            .bind(&data.file_no)
            .bind(&data.title)
            .bind(&data.contract_no)
            .bind(&data.inst_no)
            .bind(&data.arc_type)
            .bind(data.folder_id)
            .bind(data.creator_id)
            .bind(&data.group_permission)
            .bind(data.storage_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &data.contract_no, "Failed to create archive"))
    }

    async fn create_batch(&self, data: &[CreateArchive]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut inserted = 0u64;
        for item in data {
            let result = sqlx::query(INSERT_ARCHIVE)
                .bind(&item.file_no)
                .bind(&item.title)
                .bind(&item.contract_no)
                .bind(&item.inst_no)
                .bind(&item.arc_type)
                .bind(item.folder_id)
                .bind(item.creator_id)
                .bind(&item.group_permission)
                .bind(item.storage_date)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_write_error(e, &item.contract_no, "Failed to insert archive batch"))?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit archive batch", e)
        })?;

        Ok(inserted)
    }

    async fn update_fields(
        &self,
        id: ArchiveId,
        changes: &UpdateArchive,
    ) -> AppResult<Option<Archive>> {
        let conflict_key = changes.contract_no.as_deref().unwrap_or_default();
        sqlx::query_as::<_, Archive>(
            "UPDATE archives SET \
                file_no = COALESCE($2, file_no), \
                title = COALESCE($3, title), \
                contract_no = COALESCE($4, contract_no), \
                inst_no = COALESCE($5, inst_no), \
                arc_type = COALESCE($6, arc_type), \
                storage_date = COALESCE($7, storage_date), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.file_no.as_deref())
        .bind(changes.title.as_deref())
        .bind(changes.contract_no.as_deref())
        .bind(changes.inst_no.as_deref())
        .bind(changes.arc_type.as_deref())
        .bind(changes.storage_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, conflict_key, "Failed to update archive"))
    }

    async fn count_by_arc_type(&self, arc_type: &str) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM archives WHERE arc_type = $1")
            .bind(arc_type)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count archives by type", e)
            })?;
        Ok(count as u64)
    }

    async fn apply_transition(&self, audit: &CreateAuditRecord) -> AppResult<AuditRecord> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // The state guard in the WHERE clause serializes competing
        // transitions: only one of them can match the row.
        let moved = sqlx::query_scalar::<_, i64>(
            "UPDATE archives SET borrow_state = $2, updated_at = NOW() \
             WHERE contract_no = $1 AND borrow_state <> $2 RETURNING id",
        )
        .bind(&audit.contract_no)
        .bind(audit.operate_type)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update borrow state", e))?;

        if moved.is_none() {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM archives WHERE contract_no = $1)",
            )
            .bind(&audit.contract_no)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check archive existence", e)
            })?;

            return Err(if exists {
                AppError::conflict(format!(
                    "Archive '{}' is already {} (state {})",
                    audit.contract_no,
                    audit.operate_type,
                    audit.operate_type.as_code()
                ))
            } else {
                AppError::not_found(format!("Archive '{}' not found", audit.contract_no))
            });
        }

        let record = sqlx::query_as::<_, AuditRecord>(
            "INSERT INTO archive_records (contract_no, operator_id, operate_type, operate_date) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&audit.contract_no)
        .bind(audit.operator_id)
        .bind(audit.operate_type)
        .bind(audit.operate_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append audit record", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transition", e)
        })?;

        Ok(record)
    }
}
