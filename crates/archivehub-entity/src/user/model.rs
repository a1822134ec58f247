//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use archivehub_core::types::UserId;

use crate::permission::PermissionSet;

/// A principal known to ArchiveHub.
///
/// Authentication happens elsewhere; the core only needs the email a caller
/// was authenticated as and the permission group attached to it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique email address.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Labels this user holds.
    pub permission_group: PermissionSet,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to register a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Unique email address.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Labels the user holds.
    pub permission_group: PermissionSet,
}
