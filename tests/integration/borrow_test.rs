//! Audited borrow/return transitions and batch operation.

use std::sync::Arc;

use tokio::sync::Barrier;

use archivehub_core::error::ErrorKind;
use archivehub_core::types::FolderId;
use archivehub_entity::archive::{BorrowState, UpdateArchive};

use crate::helpers::TestApp;

fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
    cells
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

#[tokio::test]
async fn test_borrow_twice_conflicts_and_audits_once() {
    let app = TestApp::new().await;
    let clerk = app.login("clerk", "").await;
    let folder = app.folder(&clerk, FolderId::ROOT, "Shelf", "").await;
    let record = app.archive(&clerk, &folder, "C-1").await;
    assert_eq!(record.borrow_state, BorrowState::Available);

    let entry = app.services.borrow.borrow(&clerk, "C-1").await.unwrap();
    assert_eq!(entry.operate_type, BorrowState::Borrowed);
    assert_eq!(entry.operator_id, clerk.operator_id);

    let err = app.services.borrow.borrow(&clerk, "C-1").await.unwrap_err();
    assert!(err.is(ErrorKind::Conflict));

    let history = app
        .services
        .audit
        .history(&clerk, Some("C-1"), None, None, None)
        .await
        .unwrap();
    assert_eq!(history.total_items, 1);

    let stored = app.services.archives.get(&clerk, record.id).await.unwrap();
    assert!(stored.is_borrowed());
}

#[tokio::test]
async fn test_return_round_trip() {
    let app = TestApp::new().await;
    let clerk = app.login("clerk", "").await;
    let folder = app.folder(&clerk, FolderId::ROOT, "Shelf", "").await;
    app.archive(&clerk, &folder, "C-1").await;

    let err = app.services.borrow.return_archive(&clerk, "C-1").await.unwrap_err();
    assert!(err.is(ErrorKind::Conflict));

    app.services.borrow.borrow(&clerk, "C-1").await.unwrap();
    let back = app.services.borrow.return_archive(&clerk, "C-1").await.unwrap();
    assert_eq!(back.operate_type, BorrowState::Available);

    let history = app
        .services
        .audit
        .history(&clerk, Some("C-1"), None, None, None)
        .await
        .unwrap();
    let kinds: Vec<_> = history.items.iter().map(|r| r.operate_type).collect();
    assert_eq!(kinds, vec![BorrowState::Available, BorrowState::Borrowed]);
}

#[tokio::test]
async fn test_unknown_contract_is_not_found() {
    let app = TestApp::new().await;
    let clerk = app.login("clerk", "").await;

    let err = app.services.borrow.borrow(&clerk, "missing").await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_borrows_have_one_winner() {
    let app = TestApp::new().await;
    let clerk = app.login("clerk", "").await;
    let folder = app.folder(&clerk, FolderId::ROOT, "Shelf", "").await;
    app.archive(&clerk, &folder, "C-1").await;

    let callers = 8;
    let barrier = Arc::new(Barrier::new(callers));
    let handles: Vec<_> = (0..callers)
        .map(|_| {
            let borrow = Arc::clone(&app.services.borrow);
            let ctx = clerk.clone();
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                borrow.borrow(&ctx, "C-1").await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(callers);
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.is(ErrorKind::Conflict))
    );

    let history = app
        .services
        .audit
        .history(&clerk, Some("C-1"), None, None, None)
        .await
        .unwrap();
    assert_eq!(history.total_items, 1);
}

#[tokio::test]
async fn test_padded_contract_number_update_can_still_be_borrowed() {
    let app = TestApp::new().await;
    let clerk = app.login("clerk", "").await;
    let folder = app.folder(&clerk, FolderId::ROOT, "Shelf", "").await;
    let record = app.archive(&clerk, &folder, "C-1").await;

    let updated = app
        .services
        .archives
        .update_fields(
            &clerk,
            record.id,
            UpdateArchive {
                contract_no: Some(" C-9 ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.contract_no, "C-9");

    app.services.borrow.borrow(&clerk, " C-9 ").await.unwrap();
    app.services.borrow.return_archive(&clerk, "C-9").await.unwrap();
}

#[tokio::test]
async fn test_cancelled_context_changes_nothing() {
    let app = TestApp::new().await;
    let clerk = app.login("clerk", "").await;
    let folder = app.folder(&clerk, FolderId::ROOT, "Shelf", "").await;
    let record = app.archive(&clerk, &folder, "C-1").await;

    // A clone shares its token, so resolve a separate context to cancel.
    let cancelled = app.services.users.resolve_context(&clerk.email).await.unwrap();
    cancelled.cancel();
    let err = app.services.borrow.borrow(&cancelled, "C-1").await.unwrap_err();
    assert!(err.is(ErrorKind::Cancelled));

    let stored = app.services.archives.get(&clerk, record.id).await.unwrap();
    assert!(!stored.is_borrowed());
}

#[tokio::test]
async fn test_batch_rows_are_independent() {
    let app = TestApp::new().await;
    let clerk = app.login("clerk", "").await;
    let folder = app.folder(&clerk, FolderId::ROOT, "Shelf", "").await;
    for contract in ["C-1", "C-2", "C-3"] {
        app.archive(&clerk, &folder, contract).await;
    }

    let input = rows(&[
        &["contract_no", "operate_type"],
        &["C-1", "1"],
        &["C-2"],
        &["C-3", "1"],
    ]);
    let report = app.services.borrow.batch_operate_rows(&clerk, &input).await;

    assert_eq!(report.success_count, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row, 2);
    assert_eq!(report.failures[0].contract_no, "C-2");

    let c2 = app.services.archives.get_by_contract_no(&clerk, "C-2").await.unwrap();
    assert!(!c2.is_borrowed());
    let c3 = app.services.archives.get_by_contract_no(&clerk, "C-3").await.unwrap();
    assert!(c3.is_borrowed());
}

#[tokio::test]
async fn test_batch_reports_bad_codes_and_repeats() {
    let app = TestApp::new().await;
    let clerk = app.login("clerk", "").await;
    let folder = app.folder(&clerk, FolderId::ROOT, "Shelf", "").await;
    app.archive(&clerk, &folder, "C-1").await;

    let pairs = vec![
        ("C-1".to_string(), BorrowState::Borrowed),
        ("C-1".to_string(), BorrowState::Borrowed),
        ("C-404".to_string(), BorrowState::Borrowed),
    ];
    let report = app.services.borrow.batch_operate(&clerk, &pairs).await;
    assert_eq!(report.success_count, 1);
    let failed: Vec<_> = report.failures.iter().map(|f| f.row).collect();
    assert_eq!(failed, vec![2, 3]);

    let input = rows(&[&["contract_no", "operate_type"], &["C-1", "7"]]);
    let report = app.services.borrow.batch_operate_rows(&clerk, &input).await;
    assert_eq!(report.success_count, 0);
    assert!(report.failures[0].reason.contains("Invalid borrow state"));
}
