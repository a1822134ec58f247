//! Archive record services.

pub mod import;
pub mod service;

pub use import::{ImportReport, ImportService};
pub use service::{ArchiveService, CreateArchiveRequest};
