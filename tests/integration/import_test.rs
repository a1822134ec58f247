//! CSV import into a folder.

use archivehub_cli::input::parse_rows;
use archivehub_core::types::FolderId;
use archivehub_entity::archive::ArchiveFilter;

use crate::helpers::TestApp;

const CSV: &str = "\
file_no,title,contract_no,inst_no,arc_type,storage_date
,Lease A,C-1,I-1,lease,2024-01-15
,Lease B,C-2,I-1,lease
D-9,Deed,C-3,I-2,deed,
";

#[tokio::test]
async fn test_import_inherits_labels_and_numbers_rows() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "admin").await;
    let folder = app.folder(&admin, FolderId::ROOT, "Imports", "admin").await;

    let rows = parse_rows(CSV).unwrap();
    let report = app
        .services
        .imports
        .import_rows(&admin, folder.id, &rows)
        .await
        .unwrap();
    assert!(report.is_clean());
    assert_eq!(report.inserted, 3);

    let listed = app
        .services
        .archives
        .list(&admin, &ArchiveFilter::default(), None, None)
        .await
        .unwrap();
    assert_eq!(listed.total_items, 3);
    assert!(listed.items.iter().all(|a| a.group_permission.to_string() == "admin"));

    let b = app.services.archives.get_by_contract_no(&admin, "C-2").await.unwrap();
    assert_eq!(b.file_no, "2");
    let deed = app.services.archives.get_by_contract_no(&admin, "C-3").await.unwrap();
    assert_eq!(deed.file_no, "D-9");
    assert!(deed.storage_date.is_none());
}

#[tokio::test]
async fn test_import_rejects_existing_contract() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "").await;
    let folder = app.folder(&admin, FolderId::ROOT, "Imports", "").await;
    app.archive(&admin, &folder, "C-2").await;

    let rows = parse_rows(CSV).unwrap();
    let report = app
        .services
        .imports
        .import_rows(&admin, folder.id, &rows)
        .await
        .unwrap();
    assert_eq!(report.inserted, 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row, 2);
    assert_eq!(report.failures[0].reason, "contract number already exists");
}

#[tokio::test]
async fn test_short_row_rejects_import_but_not_batch_operate() {
    let app = TestApp::new().await;
    let clerk = app.login("clerk", "").await;
    let folder = app.folder(&clerk, FolderId::ROOT, "Shelf", "").await;
    app.archive(&clerk, &folder, "C-1").await;
    app.archive(&clerk, &folder, "C-3").await;

    let import = parse_rows(
        "file_no,title,contract_no,inst_no,arc_type\n\
         ,Lease,N-1,I-1,lease\n\
         ,Short,N-2\n\
         ,Deed,N-3,I-1,deed\n",
    )
    .unwrap();
    let report = app
        .services
        .imports
        .import_rows(&clerk, folder.id, &import)
        .await
        .unwrap();
    assert_eq!(report.inserted, 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row, 2);

    let batch = parse_rows("contract_no,operate_type\nC-1,1\nC-2\nC-3,1\n").unwrap();
    let report = app.services.borrow.batch_operate_rows(&clerk, &batch).await;
    assert_eq!(report.success_count, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row, 2);
}
