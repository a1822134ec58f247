//! Read access to the borrow/return audit trail.

use std::sync::Arc;

use archivehub_core::config::ArchiveConfig;
use archivehub_core::result::AppResult;
use archivehub_core::types::{PageRequest, PageResponse, UserId};
use archivehub_database::store::AuditLogStore;
use archivehub_entity::audit::AuditRecord;

use crate::context::OperationContext;

/// Queries audit history.
#[derive(Debug, Clone)]
pub struct AuditService {
    audit: Arc<dyn AuditLogStore>,
    config: ArchiveConfig,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(audit: Arc<dyn AuditLogStore>, config: ArchiveConfig) -> Self {
        Self { audit, config }
    }

    /// Audit entries, newest first, optionally for one contract number
    /// and/or one operator.
    pub async fn history(
        &self,
        ctx: &OperationContext,
        contract_no: Option<&str>,
        operator_id: Option<UserId>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> AppResult<PageResponse<AuditRecord>> {
        let page = PageRequest::from_raw(
            page,
            page_size,
            self.config.default_page_size,
            self.config.max_page_size,
        );
        ctx.guard(self.audit.search(contract_no, operator_id, &page))
            .await
    }
}
