//! # archivehub-entity
//!
//! Domain entity models for ArchiveHub. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`; value objects such as
//! [`PermissionSet`](permission::PermissionSet) and
//! [`BorrowState`](archive::BorrowState) implement the sqlx traits by hand
//! so they map onto plain `TEXT` columns.

pub mod archive;
pub mod audit;
pub mod folder;
pub mod permission;
pub mod user;
