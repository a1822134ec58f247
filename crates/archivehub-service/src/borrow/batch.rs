//! Batch borrow/return where every entry succeeds or fails on its own.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use archivehub_entity::archive::BorrowState;

use super::transition::BorrowService;
use crate::context::OperationContext;
use crate::report::{RowFailure, cell};

/// Outcome of a batch operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Entries that transitioned.
    pub success_count: usize,
    /// Entries that did not, with the reason.
    pub failures: Vec<RowFailure>,
}

impl BorrowService {
    /// Applies each `(contract_no, target)` pair independently.
    ///
    /// Never fails as a whole; failures are numbered from 1 in input order.
    pub async fn batch_operate(
        &self,
        ctx: &OperationContext,
        pairs: &[(String, BorrowState)],
    ) -> BatchReport {
        let entries = pairs
            .iter()
            .enumerate()
            .map(|(index, (contract_no, target))| (index + 1, contract_no.clone(), *target))
            .collect();
        self.run_batch(ctx, entries, Vec::new()).await
    }

    /// Applies tabular rows of `contract_no, operate_type`.
    ///
    /// Row 0 is a header. Short rows and unknown state codes are reported
    /// as failures for their row; the remaining rows still run.
    pub async fn batch_operate_rows(
        &self,
        ctx: &OperationContext,
        rows: &[Vec<String>],
    ) -> BatchReport {
        let mut entries = Vec::new();
        let mut failures = Vec::new();

        for (index, row) in rows.iter().enumerate().skip(1) {
            let contract_no = cell(row, 0);
            if row.len() < 2 {
                failures.push(RowFailure::new(
                    index,
                    contract_no,
                    format!("row has {} columns, expected 2", row.len()),
                ));
                continue;
            }
            if contract_no.is_empty() {
                failures.push(RowFailure::new(index, "", "contract number is blank"));
                continue;
            }
            match cell(row, 1).parse::<BorrowState>() {
                Ok(target) => entries.push((index, contract_no.to_string(), target)),
                Err(e) => failures.push(RowFailure::new(index, contract_no, e.message)),
            }
        }

        self.run_batch(ctx, entries, failures).await
    }

    async fn run_batch(
        &self,
        ctx: &OperationContext,
        entries: Vec<(usize, String, BorrowState)>,
        mut failures: Vec<RowFailure>,
    ) -> BatchReport {
        let mut success_count = 0;

        for (row, contract_no, target) in entries {
            match self.transition(ctx, &contract_no, target).await {
                Ok(_) => success_count += 1,
                Err(e) => {
                    warn!(
                        row,
                        contract_no = %contract_no,
                        error = %e,
                        "Batch entry failed"
                    );
                    failures.push(RowFailure::new(row, contract_no, e.to_string()));
                }
            }
        }
        failures.sort_by_key(|f| f.row);

        info!(
            operator_id = %ctx.operator_id,
            success_count,
            failure_count = failures.len(),
            "Batch operation finished"
        );
        BatchReport {
            success_count,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use archivehub_core::types::{FolderId, UserId};
    use archivehub_database::MemoryStore;
    use archivehub_database::store::{ArchiveStore, FolderStore};
    use archivehub_entity::archive::CreateArchive;
    use archivehub_entity::folder::CreateFolder;
    use archivehub_entity::permission::PermissionSet;

    async fn service_with(contracts: &[&str]) -> BorrowService {
        let store = MemoryStore::new();
        let folder = FolderStore::create(
            &store,
            &CreateFolder {
                name: "Shelf".to_string(),
                path: "/Shelf".to_string(),
                parent_id: FolderId::ROOT,
                group_permission: PermissionSet::empty(),
                creator_id: UserId::new(1),
            },
        )
        .await
        .unwrap();
        for contract_no in contracts {
            ArchiveStore::create(
                &store,
                &CreateArchive {
                    file_no: String::new(),
                    title: "Doc".to_string(),
                    contract_no: contract_no.to_string(),
                    inst_no: String::new(),
                    arc_type: "doc".to_string(),
                    folder_id: folder.id,
                    creator_id: UserId::new(1),
                    group_permission: PermissionSet::empty(),
                    storage_date: None,
                },
            )
            .await
            .unwrap();
        }
        BorrowService::new(Arc::new(store))
    }

    fn ctx() -> OperationContext {
        OperationContext::new(UserId::new(2), "ops@example.com", PermissionSet::empty())
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn test_rows_are_judged_independently() {
        let service = service_with(&["C-1", "C-2", "C-3"]).await;
        let rows = vec![
            row(&["contract_no", "operate_type"]),
            row(&["C-1", "1"]),
            row(&["C-2"]),
            row(&["C-3", "1"]),
        ];

        let report = service.batch_operate_rows(&ctx(), &rows).await;
        assert_eq!(report.success_count, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, 2);
        assert_eq!(report.failures[0].contract_no, "C-2");
    }

    #[tokio::test]
    async fn test_pairs_report_conflicts_and_unknowns() {
        let service = service_with(&["C-1"]).await;
        let pairs = vec![
            ("C-1".to_string(), BorrowState::Borrowed),
            ("C-1".to_string(), BorrowState::Borrowed),
            ("C-9".to_string(), BorrowState::Borrowed),
            ("C-1".to_string(), BorrowState::Available),
        ];

        let report = service.batch_operate(&ctx(), &pairs).await;
        assert_eq!(report.success_count, 2);
        let rows: Vec<_> = report.failures.iter().map(|f| f.row).collect();
        assert_eq!(rows, vec![2, 3]);
        assert!(report.failures[0].reason.starts_with("CONFLICT"));
        assert!(report.failures[1].reason.starts_with("NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_unknown_state_code() {
        let service = service_with(&["C-1"]).await;
        let rows = vec![row(&["contract_no", "operate_type"]), row(&["C-1", "7"])];

        let report = service.batch_operate_rows(&ctx(), &rows).await;
        assert_eq!(report.success_count, 0);
        assert!(report.failures[0].reason.contains("Invalid borrow state"));
    }
}
