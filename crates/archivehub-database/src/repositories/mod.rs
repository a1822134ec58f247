//! PostgreSQL implementations of the store traits.

pub mod archive;
pub mod audit;
pub mod folder;
pub mod user;

pub use archive::ArchiveRepository;
pub use audit::AuditLogRepository;
pub use folder::FolderRepository;
pub use user::UserRepository;

/// SQL predicate: the resource labels in `column` are a subset of the
/// principal labels bound at `$param` (a `TEXT[]`). Stored label strings
/// are canonical, so splitting on commas yields exact labels.
pub(crate) fn permission_predicate(column: &str, param: u32) -> String {
    format!("({column} = '' OR string_to_array({column}, ',') <@ ${param}::text[])")
}
