//! Audit trail repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use archivehub_core::error::{AppError, ErrorKind};
use archivehub_core::result::AppResult;
use archivehub_core::types::{PageRequest, PageResponse, UserId};
use archivehub_entity::audit::AuditRecord;

use crate::store::AuditLogStore;

/// PostgreSQL audit trail reader. Writes happen inside
/// [`ArchiveRepository`](super::ArchiveRepository) transitions.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogStore for AuditLogRepository {
    async fn search(
        &self,
        contract_no: Option<&str>,
        operator_id: Option<UserId>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditRecord>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if contract_no.is_some() {
            conditions.push(format!("contract_no = ${param_idx}"));
            param_idx += 1;
        }
        if operator_id.is_some() {
            conditions.push(format!("operator_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM archive_records {where_clause}");
        let select_sql = format!(
            "SELECT * FROM archive_records {where_clause} \
             ORDER BY operate_date DESC, id DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, AuditRecord>(&select_sql);

        if let Some(c) = contract_no {
            count_query = count_query.bind(c.to_string());
            select_query = select_query.bind(c.to_string());
        }
        if let Some(op) = operator_id {
            count_query = count_query.bind(op);
            select_query = select_query.bind(op);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count audit records", e)
        })?;

        let records = select_query
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search audit records", e)
            })?;

        Ok(PageResponse::new(records, page, total as u64))
    }
}
