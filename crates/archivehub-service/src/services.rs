//! Wiring of every service over one store backend.

use std::sync::Arc;

use archivehub_core::config::AppConfig;
use archivehub_database::StoreManager;

use crate::{
    ArchiveService, AuditService, BorrowService, FolderService, ImportService, TreeService,
    UserService,
};

/// All services, built over the same stores.
#[derive(Debug, Clone)]
pub struct Services {
    /// Principals.
    pub users: Arc<UserService>,
    /// Folder creation and lookup.
    pub folders: Arc<FolderService>,
    /// Tree assembly.
    pub trees: Arc<TreeService>,
    /// Record CRUD.
    pub archives: Arc<ArchiveService>,
    /// Tabular import.
    pub imports: Arc<ImportService>,
    /// Borrow/return.
    pub borrow: Arc<BorrowService>,
    /// Audit history.
    pub audit: Arc<AuditService>,
}

impl Services {
    /// Builds every service from `stores` and the archive settings in
    /// `config`.
    pub fn new(stores: &StoreManager, config: &AppConfig) -> Self {
        let archive_config = config.archive.clone();
        let archives = Arc::new(ArchiveService::new(
            stores.archives(),
            stores.folders(),
            archive_config.clone(),
        ));

        Self {
            users: Arc::new(UserService::new(stores.users())),
            folders: Arc::new(FolderService::new(stores.folders())),
            trees: Arc::new(TreeService::new(
                stores.folders(),
                stores.archives(),
                archive_config.tree_max_depth,
            )),
            imports: Arc::new(ImportService::new(
                Arc::clone(&archives),
                archive_config.import.clone(),
            )),
            borrow: Arc::new(BorrowService::new(stores.archives())),
            audit: Arc::new(AuditService::new(stores.audit(), archive_config)),
            archives,
        }
    }
}
