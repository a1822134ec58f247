//! Store traits.
//!
//! Services only see these traits. [`crate::repositories`] implements them
//! on PostgreSQL and [`crate::memory::MemoryStore`] implements them in
//! process; both must agree on every observable behavior below.

use async_trait::async_trait;

use archivehub_core::result::AppResult;
use archivehub_core::types::{ArchiveId, FolderId, PageRequest, PageResponse, UserId};
use archivehub_entity::archive::{Archive, ArchiveFilter, CreateArchive, UpdateArchive};
use archivehub_entity::audit::{AuditRecord, CreateAuditRecord};
use archivehub_entity::folder::{CreateFolder, Folder};
use archivehub_entity::permission::PermissionSet;
use archivehub_entity::user::{CreateUser, User};

/// Folder persistence.
#[async_trait]
pub trait FolderStore: Send + Sync + std::fmt::Debug + 'static {
    /// Point lookup.
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Direct children of `parent_id`, ordered by id, with no permission
    /// filtering.
    async fn list_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>>;

    /// Direct children of `parent_id` whose labels `permission` satisfies,
    /// ordered by id.
    async fn list_children_visible(
        &self,
        parent_id: FolderId,
        permission: &PermissionSet,
    ) -> AppResult<Vec<Folder>>;

    /// Insert a folder exactly as given and return it with its new id.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;
}

/// Archive record persistence.
#[async_trait]
pub trait ArchiveStore: Send + Sync + std::fmt::Debug + 'static {
    /// Point lookup by id.
    async fn find_by_id(&self, id: ArchiveId) -> AppResult<Option<Archive>>;

    /// Point lookup by contract number.
    async fn find_by_contract_no(&self, contract_no: &str) -> AppResult<Option<Archive>>;

    /// Records in a folder ordered by id, optionally limited to those
    /// `permission` satisfies.
    async fn list_by_folder(
        &self,
        folder_id: FolderId,
        permission: Option<&PermissionSet>,
    ) -> AppResult<Vec<Archive>>;

    /// Filtered, permission-scoped, paginated listing ordered by id.
    async fn search(
        &self,
        permission: &PermissionSet,
        filter: &ArchiveFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Archive>>;

    /// Insert one record. A duplicate contract number is a `Conflict`.
    async fn create(&self, data: &CreateArchive) -> AppResult<Archive>;

    /// Insert every record or none. Returns the number inserted.
    async fn create_batch(&self, data: &[CreateArchive]) -> AppResult<u64>;

    /// Apply field changes. Returns `None` when the record does not exist.
    async fn update_fields(
        &self,
        id: ArchiveId,
        changes: &UpdateArchive,
    ) -> AppResult<Option<Archive>>;

    /// Number of records of the given archive type.
    async fn count_by_arc_type(&self, arc_type: &str) -> AppResult<u64>;

    /// Atomically move the record named by `audit.contract_no` into
    /// `audit.operate_type` and append `audit`.
    ///
    /// Fails with `NotFound` when no such record exists and with `Conflict`
    /// when the record is already in the target state. In either failure
    /// nothing is written.
    async fn apply_transition(&self, audit: &CreateAuditRecord) -> AppResult<AuditRecord>;
}

/// Read access to the borrow/return audit trail. Entries are only ever
/// written by [`ArchiveStore::apply_transition`].
#[async_trait]
pub trait AuditLogStore: Send + Sync + std::fmt::Debug + 'static {
    /// Entries newest first, optionally filtered by contract number and
    /// operator.
    async fn search(
        &self,
        contract_no: Option<&str>,
        operator_id: Option<UserId>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditRecord>>;
}

/// Principal persistence.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Lookup by email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a user. A duplicate email is a `Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;
}
