//! Borrow, return and batch-operate CLI commands.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use archivehub_core::result::AppResult;
use archivehub_entity::audit::AuditRecord;
use archivehub_service::RowFailure;

use super::Session;
use crate::{input, output};

/// Arguments for borrow/return
#[derive(Debug, Args)]
pub struct TransitionArgs {
    /// Contract number of the record
    pub contract_no: String,
}

/// Arguments for batch-operate
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// CSV file with a header row and `contract_no,operate_type` rows
    pub file: PathBuf,
}

/// Audit record display row
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct AuditRow {
    /// Audit ID
    id: i64,
    /// Contract number
    contract_no: String,
    /// Operator user ID
    operator_id: i64,
    /// New state code
    operate_type: String,
    /// Transition time (UTC)
    operate_date: String,
}

impl From<&AuditRecord> for AuditRow {
    fn from(r: &AuditRecord) -> Self {
        Self {
            id: r.id.get(),
            contract_no: r.contract_no.clone(),
            operator_id: r.operator_id.get(),
            operate_type: format!("{} ({})", r.operate_type.as_code(), r.operate_type),
            operate_date: r.operate_date.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
        }
    }
}

/// Row failure display row
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct FailureRow {
    /// Input row
    row: usize,
    /// Contract number
    contract_no: String,
    /// Reason
    reason: String,
}

impl From<&RowFailure> for FailureRow {
    fn from(f: &RowFailure) -> Self {
        Self {
            row: f.row,
            contract_no: f.contract_no.clone(),
            reason: f.reason.clone(),
        }
    }
}

/// Execute `borrow`
pub async fn execute_borrow(args: &TransitionArgs, session: &Session) -> AppResult<()> {
    let ctx = session.context().await?;
    let record = session.services.borrow.borrow(&ctx, &args.contract_no).await?;
    output::print_item(&AuditRow::from(&record), session.format);
    Ok(())
}

/// Execute `return`
pub async fn execute_return(args: &TransitionArgs, session: &Session) -> AppResult<()> {
    let ctx = session.context().await?;
    let record = session
        .services
        .borrow
        .return_archive(&ctx, &args.contract_no)
        .await?;
    output::print_item(&AuditRow::from(&record), session.format);
    Ok(())
}

/// Execute `batch-operate`
pub async fn execute_batch(args: &BatchArgs, session: &Session) -> AppResult<()> {
    let ctx = session.context().await?;
    let rows = input::read_rows(&args.file)?;
    let report = session.services.borrow.batch_operate_rows(&ctx, &rows).await;

    match session.format {
        output::OutputFormat::Json => output::print_json(&report),
        output::OutputFormat::Table => {
            output::print_success(&format!("{} record(s) updated", report.success_count));
            if !report.failures.is_empty() {
                output::print_warning(&format!("{} row(s) failed", report.failures.len()));
                let rows: Vec<FailureRow> = report.failures.iter().map(FailureRow::from).collect();
                output::print_list(&rows, session.format);
            }
        }
    }
    Ok(())
}
