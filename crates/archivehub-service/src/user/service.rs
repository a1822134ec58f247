//! User registration and email-to-context resolution.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use archivehub_core::error::AppError;
use archivehub_core::result::AppResult;
use archivehub_database::store::UserStore;
use archivehub_entity::permission::PermissionSet;
use archivehub_entity::user::{CreateUser, User};

use crate::context::OperationContext;
use crate::validation::{not_blank, validate_request};

/// Request to register a user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Unique email address.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Display name.
    #[validate(custom(function = "not_blank"))]
    pub username: String,
    /// Comma-separated labels the user holds.
    pub permission_group: String,
}

/// Manages principals.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Registers a user. A duplicate email is a conflict.
    pub async fn create_user(&self, req: CreateUserRequest) -> AppResult<User> {
        validate_request(&req)?;

        let user = self
            .users
            .create(&CreateUser {
                email: req.email.trim().to_string(),
                username: req.username.trim().to_string(),
                permission_group: PermissionSet::parse(&req.permission_group),
            })
            .await?;

        info!(
            user_id = %user.id,
            email = %user.email,
            permission = %user.permission_group,
            "User created"
        );
        Ok(user)
    }

    /// Looks up a user by email.
    pub async fn get_by_email(&self, email: &str) -> AppResult<User> {
        self.users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))
    }

    /// Turns an already-authenticated email into an operation context.
    ///
    /// An email with no matching user is an authentication failure rather
    /// than a missing resource.
    pub async fn resolve_context(&self, email: &str) -> AppResult<OperationContext> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::authentication(format!("Unknown principal '{email}'")))?;
        Ok(OperationContext::for_user(&user))
    }
}
