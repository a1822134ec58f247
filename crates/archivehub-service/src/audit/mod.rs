//! Audit trail queries.

pub mod service;

pub use service::AuditService;
