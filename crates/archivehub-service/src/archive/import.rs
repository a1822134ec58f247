//! Tabular batch import of archive records.
//!
//! Input is a list of string rows. Row 0 is a header and is skipped. Data
//! rows carry `file_no, title, contract_no, inst_no, arc_type` and an
//! optional `storage_date` (`YYYY-MM-DD`). Every row is checked first; by
//! default a single rejected row means nothing is inserted, and the
//! accepted rows are otherwise written in one all-or-nothing batch.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use archivehub_core::config::ImportConfig;
use archivehub_core::result::AppResult;
use archivehub_core::types::FolderId;

use super::service::{ArchiveService, CreateArchiveRequest, inherit};
use crate::context::OperationContext;
use crate::report::{RowFailure, cell};
use crate::validation::validate_request;

const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of an import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    /// Number of data rows examined (header excluded).
    pub total_rows: usize,
    /// Number of records written.
    pub inserted: u64,
    /// Rows that were rejected.
    pub failures: Vec<RowFailure>,
}

impl ImportReport {
    /// Whether every row was accepted.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Imports archive records from tabular rows.
#[derive(Debug, Clone)]
pub struct ImportService {
    archives: Arc<ArchiveService>,
    config: ImportConfig,
}

impl ImportService {
    /// Creates a new import service.
    pub fn new(archives: Arc<ArchiveService>, config: ImportConfig) -> Self {
        Self { archives, config }
    }

    /// Imports `rows` into `folder_id`.
    ///
    /// Row-level problems are reported, not returned as errors. A storage
    /// failure during the final insert aborts the whole batch and is
    /// returned as an error.
    pub async fn import_rows(
        &self,
        ctx: &OperationContext,
        folder_id: FolderId,
        rows: &[Vec<String>],
    ) -> AppResult<ImportReport> {
        let folder = self.archives.owning_folder(ctx, folder_id).await?;
        let store = self.archives.store();

        let mut report = ImportReport {
            total_rows: rows.len().saturating_sub(1),
            ..Default::default()
        };
        let mut accepted = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut type_counts: HashMap<String, u64> = HashMap::new();

        for (index, row) in rows.iter().enumerate().skip(1) {
            let mut req = match self.parse_row(row) {
                Ok(req) => req,
                Err(reason) => {
                    report.failures.push(RowFailure::new(index, cell(row, 2), reason));
                    continue;
                }
            };
            req.folder_id = folder.id;

            if !seen.insert(req.contract_no.clone()) {
                report.failures.push(RowFailure::new(
                    index,
                    &req.contract_no,
                    "contract number repeated in this import",
                ));
                continue;
            }
            if ctx
                .guard(store.find_by_contract_no(&req.contract_no))
                .await?
                .is_some()
            {
                report.failures.push(RowFailure::new(
                    index,
                    &req.contract_no,
                    "contract number already exists",
                ));
                continue;
            }

            // Rows of a type already accepted here count toward the next
            // sequence number just as stored rows do.
            if !type_counts.contains_key(&req.arc_type) {
                let existing = ctx.guard(store.count_by_arc_type(&req.arc_type)).await?;
                type_counts.insert(req.arc_type.clone(), existing);
            }
            let count = type_counts.entry(req.arc_type.clone()).or_default();
            *count += 1;
            let file_no = if req.file_no.is_empty() {
                count.to_string()
            } else {
                req.file_no.clone()
            };

            accepted.push(inherit(&folder, req, file_no, ctx));
        }

        for failure in &report.failures {
            warn!(
                row = failure.row,
                contract_no = %failure.contract_no,
                reason = %failure.reason,
                "Import row rejected"
            );
        }

        if !report.failures.is_empty() && !self.config.skip_invalid_rows {
            info!(
                folder_id = %folder.id,
                rejected = report.failures.len(),
                "Import rejected, nothing inserted"
            );
            return Ok(report);
        }

        if !accepted.is_empty() {
            report.inserted = ctx.guard(store.create_batch(&accepted)).await?;
        }

        info!(
            operator_id = %ctx.operator_id,
            folder_id = %folder.id,
            inserted = report.inserted,
            rejected = report.failures.len(),
            "Import finished"
        );
        Ok(report)
    }

    fn parse_row(&self, row: &[String]) -> Result<CreateArchiveRequest, String> {
        if row.len() < self.config.min_columns {
            return Err(format!(
                "row has {} columns, expected at least {}",
                row.len(),
                self.config.min_columns
            ));
        }

        let storage_date = match cell(row, 5) {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, STORAGE_DATE_FORMAT)
                    .map_err(|_| format!("invalid storage date '{raw}', expected YYYY-MM-DD"))?,
            ),
        };

        let req = CreateArchiveRequest {
            file_no: cell(row, 0).to_string(),
            title: cell(row, 1).to_string(),
            contract_no: cell(row, 2).to_string(),
            inst_no: cell(row, 3).to_string(),
            arc_type: cell(row, 4).to_string(),
            folder_id: FolderId::ROOT,
            storage_date,
        };
        validate_request(&req).map_err(|e| e.message)?;
        Ok(req)
    }
}
