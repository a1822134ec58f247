//! Permission-filtered tree assembly.

use archivehub_core::types::FolderId;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_tree_hides_labelled_subtree() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "admin,user").await;
    let clerk = app.login("clerk", "user").await;

    let a = app.folder(&admin, FolderId::ROOT, "A", "admin,user").await;
    let b = app.folder(&admin, a.id, "B", "").await;
    app.archive(&admin, &b, "C-1").await;
    let public = app.folder(&admin, FolderId::ROOT, "Public", "").await;
    app.archive(&admin, &public, "C-2").await;

    let admin_only = app.login("admin-only", "admin").await;
    let forest = app.services.trees.build_tree(&admin_only, FolderId::ROOT).await.unwrap();
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].folder.id, public.id);

    let forest = app.services.trees.build_tree(&clerk, FolderId::ROOT).await.unwrap();
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].folder.id, public.id);
    assert_eq!(forest[0].records.len(), 1);

    let forest = app.services.trees.build_tree(&admin, FolderId::ROOT).await.unwrap();
    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0].folder.id, a.id);
    assert_eq!(forest[0].children.len(), 1);
    assert_eq!(forest[0].children[0].folder.id, b.id);
    assert_eq!(forest[0].children[0].records[0].contract_no, "C-1");
    assert_eq!(forest[0].record_count(), 1);
}

#[tokio::test]
async fn test_tree_of_empty_store_is_empty() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "admin").await;

    let forest = app.services.trees.build_tree(&admin, FolderId::ROOT).await.unwrap();
    assert!(forest.is_empty());
}

#[tokio::test]
async fn test_tree_serializes_folder_fields_inline() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "").await;
    let a = app.folder(&admin, FolderId::ROOT, "A", "").await;
    app.folder(&admin, a.id, "B", "").await;

    let forest = app.services.trees.build_tree(&admin, FolderId::ROOT).await.unwrap();
    let json = serde_json::to_value(&forest).unwrap();
    assert_eq!(json[0]["name"], "A");
    assert_eq!(json[0]["children"][0]["name"], "B");
    assert_eq!(json[0]["children"][0]["records"].as_array().map(Vec::len), Some(0));
}
