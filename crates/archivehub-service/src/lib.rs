//! # archivehub-service
//!
//! Business logic for ArchiveHub. Each service wraps one or more store
//! traits from `archivehub-database` and implements a use case: permission
//! inheritance on create, permission-filtered trees, audited borrow/return,
//! tabular import and batch operations.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time as `Arc<dyn Store>` handles, and every call takes the
//! caller's [`OperationContext`].

pub mod archive;
pub mod audit;
pub mod borrow;
pub mod context;
pub mod folder;
pub mod report;
pub mod services;
pub mod user;
pub mod validation;

pub use archive::{ArchiveService, ImportReport, ImportService};
pub use audit::AuditService;
pub use borrow::{BatchReport, BorrowService};
pub use context::OperationContext;
pub use folder::{FolderService, TreeService};
pub use report::RowFailure;
pub use services::Services;
pub use user::UserService;
