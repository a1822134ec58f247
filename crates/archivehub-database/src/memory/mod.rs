//! In-process store with the same semantics as the PostgreSQL repositories.
//!
//! All tables live behind one `tokio::sync::RwLock`, so a write (a batch
//! insert, a borrow/return with its audit entry) is observed either
//! completely or not at all.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use archivehub_core::error::AppError;
use archivehub_core::result::AppResult;
use archivehub_core::types::{
    ArchiveId, AuditRecordId, FolderId, PageRequest, PageResponse, UserId,
};
use archivehub_entity::archive::{
    Archive, ArchiveFilter, BorrowState, CreateArchive, UpdateArchive,
};
use archivehub_entity::audit::{AuditRecord, CreateAuditRecord};
use archivehub_entity::folder::{CreateFolder, Folder};
use archivehub_entity::permission::PermissionSet;
use archivehub_entity::user::{CreateUser, User};

use crate::store::{ArchiveStore, AuditLogStore, FolderStore, UserStore};

#[derive(Debug, Default)]
struct Tables {
    folders: BTreeMap<FolderId, Folder>,
    archives: BTreeMap<ArchiveId, Archive>,
    audit: Vec<AuditRecord>,
    users: BTreeMap<UserId, User>,
    last_folder_id: i64,
    last_archive_id: i64,
    last_audit_id: i64,
    last_user_id: i64,
}

impl Tables {
    fn contract_no_taken(&self, contract_no: &str, except: Option<ArchiveId>) -> bool {
        self.archives
            .values()
            .any(|a| a.contract_no == contract_no && Some(a.id) != except)
    }

    fn insert_archive(&mut self, data: &CreateArchive) -> Archive {
        self.last_archive_id += 1;
        let now = Utc::now();
        let archive = Archive {
            id: ArchiveId::new(self.last_archive_id),
            file_no: data.file_no.clone(),
            title: data.title.clone(),
            contract_no: data.contract_no.clone(),
            inst_no: data.inst_no.clone(),
            arc_type: data.arc_type.clone(),
            borrow_state: BorrowState::Available,
            folder_id: data.folder_id,
            creator_id: data.creator_id,
            group_permission: data.group_permission.clone(),
            storage_date: data.storage_date,
            created_at: now,
            updated_at: now,
        };
        self.archives.insert(archive.id, archive.clone());
        archive
    }
}

fn duplicate_contract(contract_no: &str) -> AppError {
    AppError::conflict(format!("Contract number '{contract_no}' already exists"))
}

/// Mirrors the foreign key violation PostgreSQL reports.
fn missing_folder(folder_id: FolderId) -> AppError {
    AppError::database(format!("Folder {folder_id} does not exist"))
}

fn paginate<T>(items: Vec<T>, page: &PageRequest) -> PageResponse<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    PageResponse::new(items, page, total)
}

/// Store backed by process memory. Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.tables.read().await.folders.get(&id).cloned())
    }

    async fn list_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        let tables = self.tables.read().await;
        Ok(tables
            .folders
            .values()
            .filter(|f| f.parent_id == parent_id)
            .cloned()
            .collect())
    }

    async fn list_children_visible(
        &self,
        parent_id: FolderId,
        permission: &PermissionSet,
    ) -> AppResult<Vec<Folder>> {
        let tables = self.tables.read().await;
        Ok(tables
            .folders
            .values()
            .filter(|f| f.parent_id == parent_id && f.group_permission.is_satisfied_by(permission))
            .cloned()
            .collect())
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut tables = self.tables.write().await;
        tables.last_folder_id += 1;
        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(tables.last_folder_id),
            name: data.name.clone(),
            path: data.path.clone(),
            parent_id: data.parent_id,
            group_permission: data.group_permission.clone(),
            creator_id: data.creator_id,
            created_at: now,
            updated_at: now,
        };
        tables.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }
}

#[async_trait]
impl ArchiveStore for MemoryStore {
    async fn find_by_id(&self, id: ArchiveId) -> AppResult<Option<Archive>> {
        Ok(self.tables.read().await.archives.get(&id).cloned())
    }

    async fn find_by_contract_no(&self, contract_no: &str) -> AppResult<Option<Archive>> {
        let tables = self.tables.read().await;
        Ok(tables
            .archives
            .values()
            .find(|a| a.contract_no == contract_no)
            .cloned())
    }

    async fn list_by_folder(
        &self,
        folder_id: FolderId,
        permission: Option<&PermissionSet>,
    ) -> AppResult<Vec<Archive>> {
        let tables = self.tables.read().await;
        Ok(tables
            .archives
            .values()
            .filter(|a| a.folder_id == folder_id)
            .filter(|a| permission.is_none_or(|p| a.group_permission.is_satisfied_by(p)))
            .cloned()
            .collect())
    }

    async fn search(
        &self,
        permission: &PermissionSet,
        filter: &ArchiveFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Archive>> {
        let tables = self.tables.read().await;
        let matching: Vec<Archive> = tables
            .archives
            .values()
            .filter(|a| a.group_permission.is_satisfied_by(permission) && filter.matches(a))
            .cloned()
            .collect();
        Ok(paginate(matching, page))
    }

    async fn create(&self, data: &CreateArchive) -> AppResult<Archive> {
        let mut tables = self.tables.write().await;
        if tables.contract_no_taken(&data.contract_no, None) {
            return Err(duplicate_contract(&data.contract_no));
        }
        if !tables.folders.contains_key(&data.folder_id) {
            return Err(missing_folder(data.folder_id));
        }
        Ok(tables.insert_archive(data))
    }

    async fn create_batch(&self, data: &[CreateArchive]) -> AppResult<u64> {
        let mut tables = self.tables.write().await;

        // Check every constraint before touching the tables.
        let mut seen = std::collections::HashSet::new();
        for item in data {
            if !seen.insert(item.contract_no.as_str())
                || tables.contract_no_taken(&item.contract_no, None)
            {
                return Err(duplicate_contract(&item.contract_no));
            }
            if !tables.folders.contains_key(&item.folder_id) {
                return Err(missing_folder(item.folder_id));
            }
        }

        for item in data {
            tables.insert_archive(item);
        }
        debug!(count = data.len(), "Inserted archive batch");
        Ok(data.len() as u64)
    }

    async fn update_fields(
        &self,
        id: ArchiveId,
        changes: &UpdateArchive,
    ) -> AppResult<Option<Archive>> {
        let mut tables = self.tables.write().await;
        if let Some(contract_no) = &changes.contract_no {
            if tables.contract_no_taken(contract_no, Some(id)) {
                return Err(duplicate_contract(contract_no));
            }
        }

        let Some(archive) = tables.archives.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(archive);
        archive.updated_at = Utc::now();
        Ok(Some(archive.clone()))
    }

    async fn count_by_arc_type(&self, arc_type: &str) -> AppResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables
            .archives
            .values()
            .filter(|a| a.arc_type == arc_type)
            .count() as u64)
    }

    async fn apply_transition(&self, audit: &CreateAuditRecord) -> AppResult<AuditRecord> {
        let mut tables = self.tables.write().await;

        let archive = tables
            .archives
            .values_mut()
            .find(|a| a.contract_no == audit.contract_no)
            .ok_or_else(|| AppError::not_found(format!("Archive '{}' not found", audit.contract_no)))?;

        if archive.borrow_state == audit.operate_type {
            return Err(AppError::conflict(format!(
                "Archive '{}' is already {} (state {})",
                audit.contract_no,
                audit.operate_type,
                audit.operate_type.as_code()
            )));
        }
        archive.borrow_state = audit.operate_type;
        archive.updated_at = Utc::now();

        tables.last_audit_id += 1;
        let record = AuditRecord {
            id: AuditRecordId::new(tables.last_audit_id),
            contract_no: audit.contract_no.clone(),
            operator_id: audit.operator_id,
            operate_type: audit.operate_type,
            operate_date: audit.operate_date,
        };
        tables.audit.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl AuditLogStore for MemoryStore {
    async fn search(
        &self,
        contract_no: Option<&str>,
        operator_id: Option<UserId>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditRecord>> {
        let tables = self.tables.read().await;
        let mut matching: Vec<AuditRecord> = tables
            .audit
            .iter()
            .filter(|r| contract_no.is_none_or(|c| r.contract_no == c))
            .filter(|r| operator_id.is_none_or(|op| r.operator_id == op))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.operate_date.cmp(&a.operate_date).then(b.id.cmp(&a.id)));
        Ok(paginate(matching, page))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == data.email) {
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                data.email
            )));
        }
        tables.last_user_id += 1;
        let user = User {
            id: UserId::new(tables.last_user_id),
            email: data.email.clone(),
            username: data.username.clone(),
            permission_group: data.permission_group.clone(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}
