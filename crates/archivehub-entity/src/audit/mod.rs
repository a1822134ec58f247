//! Borrow/return audit trail entities.

pub mod model;

pub use model::{AuditRecord, CreateAuditRecord};
