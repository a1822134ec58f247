//! # archivehub-database
//!
//! Storage for ArchiveHub: the async store traits the services depend on,
//! their PostgreSQL implementations, an in-memory implementation with the
//! same semantics, and the [`StoreManager`] that builds whichever backend
//! the configuration selects.

pub mod connection;
pub mod manager;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use manager::StoreManager;
pub use memory::MemoryStore;
pub use store::{ArchiveStore, AuditLogStore, FolderStore, UserStore};
