//! Operation context carrying the acting principal and a cancellation handle.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use archivehub_core::error::AppError;
use archivehub_core::result::AppResult;
use archivehub_core::types::UserId;
use archivehub_entity::permission::PermissionSet;
use archivehub_entity::user::User;

/// Context for one caller-initiated operation.
///
/// Built by [`UserService::resolve_context`](crate::UserService::resolve_context)
/// once the caller's email is known, then passed into every service method
/// so each operation knows who is acting and which labels they hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationContext {
    /// The acting user. Recorded as the operator in audit entries.
    pub operator_id: UserId,
    /// The acting user's email.
    pub email: String,
    /// Labels the caller holds.
    pub permission: PermissionSet,
    #[serde(skip)]
    cancel: CancellationToken,
}

impl OperationContext {
    /// Creates a context with a fresh cancellation token.
    pub fn new(operator_id: UserId, email: impl Into<String>, permission: PermissionSet) -> Self {
        Self {
            operator_id,
            email: email.into(),
            permission,
            cancel: CancellationToken::new(),
        }
    }

    /// Creates a context acting as `user`.
    pub fn for_user(user: &User) -> Self {
        Self::new(user.id, user.email.clone(), user.permission_group.clone())
    }

    /// Replaces the cancellation token, e.g. with a child of a shutdown token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The token observed by store calls made under this context.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel every in-flight and future store call made under this context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run a store call, abandoning it when the context is cancelled.
    ///
    /// Dropping an abandoned call drops any open transaction with it, which
    /// rolls the transaction back.
    pub async fn guard<T, F>(&self, call: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(AppError::cancelled("Operation cancelled"));
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AppError::cancelled("Operation cancelled")),
            result = call => result,
        }
    }
}
