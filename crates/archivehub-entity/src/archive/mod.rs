//! Archive (record) domain entities.

pub mod model;
pub mod state;

pub use model::{Archive, ArchiveFilter, CreateArchive, UpdateArchive};
pub use state::BorrowState;
