//! Audit history queries.

use archivehub_core::types::FolderId;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_history_filters_by_operator_and_pages() {
    let app = TestApp::new().await;
    let alice = app.login("alice", "").await;
    let bob = app.login("bob", "").await;
    let folder = app.folder(&alice, FolderId::ROOT, "Shelf", "").await;
    for contract in ["C-1", "C-2", "C-3"] {
        app.archive(&alice, &folder, contract).await;
    }

    app.services.borrow.borrow(&alice, "C-1").await.unwrap();
    app.services.borrow.borrow(&bob, "C-2").await.unwrap();
    app.services.borrow.borrow(&bob, "C-3").await.unwrap();

    let bobs = app
        .services
        .audit
        .history(&alice, None, Some(bob.operator_id), None, None)
        .await
        .unwrap();
    let contracts: Vec<_> = bobs.items.iter().map(|r| r.contract_no.as_str()).collect();
    assert_eq!(contracts, vec!["C-3", "C-2"]);

    let page = app
        .services
        .audit
        .history(&alice, None, None, Some(2), Some(2))
        .await
        .unwrap();
    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].contract_no, "C-1");

    // Non-positive paging falls back to the defaults.
    let fallback = app
        .services
        .audit
        .history(&alice, None, None, Some(0), Some(-5))
        .await
        .unwrap();
    assert_eq!(fallback.page, 1);
    assert_eq!(fallback.page_size, app.config.archive.default_page_size);
}
