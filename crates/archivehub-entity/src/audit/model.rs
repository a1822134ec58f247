//! Borrow/return audit record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use archivehub_core::types::{AuditRecordId, UserId};

use crate::archive::BorrowState;

/// An immutable entry recording one successful borrow or return.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditRecord {
    /// Unique audit record identifier.
    pub id: AuditRecordId,
    /// Contract number of the record that changed.
    pub contract_no: String,
    /// The principal who performed the transition.
    pub operator_id: UserId,
    /// The state the record moved to.
    pub operate_type: BorrowState,
    /// When the transition happened (UTC, millisecond precision).
    pub operate_date: DateTime<Utc>,
}

/// Data required to append an audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditRecord {
    /// Contract number of the record that changed.
    pub contract_no: String,
    /// The acting principal.
    pub operator_id: UserId,
    /// The state the record moved to.
    pub operate_type: BorrowState,
    /// Transition timestamp.
    pub operate_date: DateTime<Utc>,
}
