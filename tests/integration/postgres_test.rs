//! End-to-end checks against a live PostgreSQL database.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Barrier;

use archivehub_core::error::ErrorKind;
use archivehub_core::types::FolderId;
use archivehub_entity::archive::{ArchiveFilter, BorrowState};
use archivehub_entity::audit::CreateAuditRecord;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_postgres_borrow_flow() {
    let app = TestApp::postgres().await;
    let admin = app.login("admin", "admin,user").await;
    let clerk = app.login("clerk", "user").await;

    let top = app
        .folder(&admin, FolderId::ROOT, &app.unique("Locked"), "admin,user")
        .await;
    let child = app.folder(&admin, top.id, "Inner", "").await;
    assert_eq!(child.group_permission, top.group_permission);

    let contract = app.unique("C-PG");
    let record = app.archive(&admin, &child, &contract).await;
    assert_eq!(record.group_permission.to_string(), "admin,user");

    let err = app.services.archives.get(&clerk, record.id).await.unwrap_err();
    assert!(err.is(ErrorKind::Authorization));

    app.services.borrow.borrow(&admin, &contract).await.unwrap();
    let err = app.services.borrow.borrow(&admin, &contract).await.unwrap_err();
    assert!(err.is(ErrorKind::Conflict));

    let history = app
        .services
        .audit
        .history(&admin, Some(contract.as_str()), None, None, None)
        .await
        .unwrap();
    assert_eq!(history.total_items, 1);

    let filter = ArchiveFilter {
        contract_no: Some(contract.clone()),
        ..Default::default()
    };
    let hidden = app.services.archives.list(&clerk, &filter, None, None).await.unwrap();
    assert_eq!(hidden.total_items, 0);

    app.stores.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires DATABASE_URL"]
async fn test_postgres_concurrent_borrows_have_one_winner() {
    let app = TestApp::postgres().await;
    let clerk = app.login("clerk", "").await;
    let folder = app.folder(&clerk, FolderId::ROOT, &app.unique("Race"), "").await;
    let contract = app.unique("C-RACE");
    app.archive(&clerk, &folder, &contract).await;

    let callers = 8;
    let barrier = Arc::new(Barrier::new(callers));
    let handles: Vec<_> = (0..callers)
        .map(|_| {
            let borrow = Arc::clone(&app.services.borrow);
            let ctx = clerk.clone();
            let contract = contract.clone();
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                borrow.borrow(&ctx, &contract).await
            })
        })
        .collect();

    let mut wins = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            wins += 1;
        }
    }
    assert_eq!(wins, 1);

    app.stores.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires DATABASE_URL"]
async fn test_postgres_racing_transitions_from_same_state_have_one_winner() {
    let app = TestApp::postgres().await;
    let clerk = app.login("clerk", "").await;
    let folder = app.folder(&clerk, FolderId::ROOT, &app.unique("Cas"), "").await;
    let contract = app.unique("C-CAS");
    app.archive(&clerk, &folder, &contract).await;

    let archives = app.stores.archives();
    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let archives = Arc::clone(&archives);
            let barrier = Arc::clone(&barrier);
            let audit = CreateAuditRecord {
                contract_no: contract.clone(),
                operator_id: clerk.operator_id,
                operate_type: BorrowState::Borrowed,
                operate_date: Utc::now(),
            };
            tokio::spawn(async move {
                barrier.wait().await;
                archives.apply_transition(&audit).await
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.is(ErrorKind::Conflict))
    );

    app.stores.close().await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_postgres_far_page_is_empty() {
    let app = TestApp::postgres().await;
    let clerk = app.login("clerk", "").await;
    let folder = app.folder(&clerk, FolderId::ROOT, &app.unique("Far"), "").await;
    let contract = app.unique("C-FAR");
    app.archive(&clerk, &folder, &contract).await;
    app.services.borrow.borrow(&clerk, &contract).await.unwrap();

    let filter = ArchiveFilter {
        contract_no: Some(contract.clone()),
        ..Default::default()
    };
    let listed = app
        .services
        .archives
        .list(&clerk, &filter, Some(i64::MAX), Some(100))
        .await
        .unwrap();
    assert!(listed.items.is_empty());
    assert_eq!(listed.total_items, 1);

    let history = app
        .services
        .audit
        .history(&clerk, Some(contract.as_str()), None, Some(i64::MAX), Some(100))
        .await
        .unwrap();
    assert!(history.items.is_empty());
    assert_eq!(history.total_items, 1);

    app.stores.close().await;
}
