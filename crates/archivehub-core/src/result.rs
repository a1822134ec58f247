//! Convenience result type alias for ArchiveHub.

use crate::error::AppError;

/// A specialized `Result` type for ArchiveHub operations.
pub type AppResult<T> = Result<T, AppError>;
