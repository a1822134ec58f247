//! # archivehub-core
//!
//! Core crate for ArchiveHub. Contains configuration schemas, typed
//! integer identifiers, pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ArchiveHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
