//! Shared test helpers for integration tests.

use archivehub_core::config::{AppConfig, StoreProvider};
use archivehub_core::types::FolderId;
use archivehub_database::StoreManager;
use archivehub_entity::archive::Archive;
use archivehub_entity::folder::Folder;
use archivehub_entity::permission::PermissionSet;
use archivehub_service::archive::CreateArchiveRequest;
use archivehub_service::folder::CreateFolderRequest;
use archivehub_service::user::CreateUserRequest;
use archivehub_service::{OperationContext, Services};

/// Test application context
pub struct TestApp {
    /// Stores behind the services
    pub stores: StoreManager,
    /// All services over `stores`
    pub services: Services,
    /// Application config
    pub config: AppConfig,
    suffix: String,
}

impl TestApp {
    /// Create a test application over a fresh in-memory store
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.store.provider = StoreProvider::Memory;
        Self::with_config(config, String::new()).await
    }

    /// Create a test application over PostgreSQL at `DATABASE_URL`.
    ///
    /// Names are suffixed so repeated runs against one database don't
    /// collide on unique columns.
    pub async fn postgres() -> Self {
        let mut config = AppConfig::default();
        config.store.provider = StoreProvider::Postgres;
        config.store.auto_migrate = true;
        config.database.url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
        let suffix = format!(
            "-{}",
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        );
        Self::with_config(config, suffix).await
    }

    async fn with_config(config: AppConfig, suffix: String) -> Self {
        let stores = StoreManager::new(&config)
            .await
            .expect("Failed to init store");
        let services = Services::new(&stores, &config);
        Self {
            stores,
            services,
            config,
            suffix,
        }
    }

    /// Make a unique-per-run contract number or email local part
    pub fn unique(&self, name: &str) -> String {
        format!("{name}{}", self.suffix)
    }

    /// Register a principal holding `labels` and return its context
    pub async fn login(&self, name: &str, labels: &str) -> OperationContext {
        let email = format!("{}@example.com", self.unique(name));
        self.services
            .users
            .create_user(CreateUserRequest {
                email: email.clone(),
                username: name.to_string(),
                permission_group: labels.to_string(),
            })
            .await
            .expect("Failed to create user");
        self.services
            .users
            .resolve_context(&email)
            .await
            .expect("Failed to resolve user")
    }

    /// Create a folder; `labels` only matters at the top level
    pub async fn folder(
        &self,
        ctx: &OperationContext,
        parent: FolderId,
        name: &str,
        labels: &str,
    ) -> Folder {
        self.services
            .folders
            .create_folder(
                ctx,
                CreateFolderRequest {
                    name: name.to_string(),
                    path: None,
                    parent_id: parent,
                    root_permission: PermissionSet::parse(labels),
                },
            )
            .await
            .expect("Failed to create folder")
    }

    /// Create a record in `folder`
    pub async fn archive(&self, ctx: &OperationContext, folder: &Folder, contract_no: &str) -> Archive {
        self.services
            .archives
            .create(
                ctx,
                CreateArchiveRequest {
                    title: format!("Contract {contract_no}"),
                    contract_no: contract_no.to_string(),
                    arc_type: "lease".to_string(),
                    folder_id: folder.id,
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to create archive")
    }
}
