//! Store manager that builds the configured backend.

use std::sync::Arc;

use tracing::info;

use archivehub_core::config::{AppConfig, StoreProvider};
use archivehub_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{
    ArchiveRepository, AuditLogRepository, FolderRepository, UserRepository,
};
use crate::store::{ArchiveStore, AuditLogStore, FolderStore, UserStore};

/// Hands out the store trait objects for the selected provider.
#[derive(Debug, Clone)]
pub struct StoreManager {
    folders: Arc<dyn FolderStore>,
    archives: Arc<dyn ArchiveStore>,
    audit: Arc<dyn AuditLogStore>,
    users: Arc<dyn UserStore>,
    database: Option<DatabasePool>,
}

impl StoreManager {
    /// Build the store selected by `config.store.provider`.
    pub async fn new(config: &AppConfig) -> AppResult<Self> {
        match config.store.provider {
            StoreProvider::Postgres => {
                info!("Initializing PostgreSQL store");
                let db = DatabasePool::connect(&config.database).await?;
                if config.store.auto_migrate {
                    run_migrations(db.pool()).await?;
                }
                Ok(Self::from_database(db))
            }
            StoreProvider::Memory => {
                info!("Initializing in-memory store");
                Ok(Self::from_memory(MemoryStore::new()))
            }
        }
    }

    /// Use PostgreSQL repositories over an existing pool.
    pub fn from_database(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            folders: Arc::new(FolderRepository::new(pool.clone())),
            archives: Arc::new(ArchiveRepository::new(pool.clone())),
            audit: Arc::new(AuditLogRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool)),
            database: Some(db),
        }
    }

    /// Use one shared memory store for every trait.
    pub fn from_memory(store: MemoryStore) -> Self {
        Self {
            folders: Arc::new(store.clone()),
            archives: Arc::new(store.clone()),
            audit: Arc::new(store.clone()),
            users: Arc::new(store),
            database: None,
        }
    }

    /// Run migrations. A no-op for the memory store.
    pub async fn migrate(&self) -> AppResult<()> {
        match &self.database {
            Some(db) => run_migrations(db.pool()).await,
            None => {
                info!("Memory store has no schema to migrate");
                Ok(())
            }
        }
    }

    /// Check the backing database answers. Always succeeds for memory.
    pub async fn ping(&self) -> AppResult<()> {
        match &self.database {
            Some(db) => db.ping().await,
            None => Ok(()),
        }
    }

    /// Release pooled connections, if any.
    pub async fn close(&self) {
        if let Some(db) = &self.database {
            db.close().await;
        }
    }

    /// Folder store.
    pub fn folders(&self) -> Arc<dyn FolderStore> {
        Arc::clone(&self.folders)
    }

    /// Archive store.
    pub fn archives(&self) -> Arc<dyn ArchiveStore> {
        Arc::clone(&self.archives)
    }

    /// Audit trail store.
    pub fn audit(&self) -> Arc<dyn AuditLogStore> {
        Arc::clone(&self.audit)
    }

    /// User store.
    pub fn users(&self) -> Arc<dyn UserStore> {
        Arc::clone(&self.users)
    }
}
