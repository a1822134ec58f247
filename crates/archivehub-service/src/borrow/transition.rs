//! Borrow/return state machine.
//!
//! `Available -> Borrowed` is a borrow and `Borrowed -> Available` a
//! return. Each successful move writes the new state and one audit record
//! in a single store transaction.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tracing::info;

use archivehub_core::error::AppError;
use archivehub_core::result::AppResult;
use archivehub_database::store::ArchiveStore;
use archivehub_entity::archive::BorrowState;
use archivehub_entity::audit::{AuditRecord, CreateAuditRecord};

use crate::context::OperationContext;

/// Performs audited borrow/return transitions.
#[derive(Debug, Clone)]
pub struct BorrowService {
    archives: Arc<dyn ArchiveStore>,
}

impl BorrowService {
    /// Creates a new borrow service.
    pub fn new(archives: Arc<dyn ArchiveStore>) -> Self {
        Self { archives }
    }

    /// Lends out the record with `contract_no`.
    pub async fn borrow(&self, ctx: &OperationContext, contract_no: &str) -> AppResult<AuditRecord> {
        self.transition(ctx, contract_no, BorrowState::Borrowed).await
    }

    /// Puts the record with `contract_no` back on the shelf.
    pub async fn return_archive(
        &self,
        ctx: &OperationContext,
        contract_no: &str,
    ) -> AppResult<AuditRecord> {
        self.transition(ctx, contract_no, BorrowState::Available).await
    }

    /// Moves the record with `contract_no` into `target`.
    ///
    /// Fails with `NotFound` for an unknown contract number and with
    /// `Conflict` when the record is already in `target`, including when a
    /// concurrent call got there first. The operator recorded in the audit
    /// entry is the context's operator.
    pub async fn transition(
        &self,
        ctx: &OperationContext,
        contract_no: &str,
        target: BorrowState,
    ) -> AppResult<AuditRecord> {
        let contract_no = contract_no.trim();
        let archive = ctx
            .guard(self.archives.find_by_contract_no(contract_no))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Archive '{contract_no}' not found")))?;

        if archive.borrow_state == target {
            return Err(AppError::conflict(format!(
                "Archive '{contract_no}' is already {target} (state {})",
                target.as_code()
            )));
        }

        let record = ctx
            .guard(self.archives.apply_transition(&CreateAuditRecord {
                contract_no: archive.contract_no.clone(),
                operator_id: ctx.operator_id,
                operate_type: target,
                operate_date: Utc::now().trunc_subsecs(3),
            }))
            .await?;

        info!(
            operator_id = %ctx.operator_id,
            contract_no = %record.contract_no,
            action = target.transition_name(),
            audit_id = %record.id,
            "Archive state changed"
        );
        Ok(record)
    }
}
