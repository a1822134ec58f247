//! Archive record entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use archivehub_core::types::{ArchiveId, FolderId, UserId};

use super::state::BorrowState;
use crate::permission::PermissionSet;

/// An archived document entry. Always belongs to exactly one folder.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Archive {
    /// Unique record identifier.
    pub id: ArchiveId,
    /// Document number, unique per archive type by convention.
    pub file_no: String,
    /// Document title.
    pub title: String,
    /// Contract number. Identifies the record for borrow/return.
    pub contract_no: String,
    /// Institution number.
    pub inst_no: String,
    /// Archive type.
    pub arc_type: String,
    /// Whether the record is on the shelf or lent out.
    pub borrow_state: BorrowState,
    /// Owning folder.
    pub folder_id: FolderId,
    /// User who created the record.
    pub creator_id: UserId,
    /// Labels required to see the record. Copied from the folder at
    /// creation and never changed afterwards.
    pub group_permission: PermissionSet,
    /// Date the physical document entered storage.
    pub storage_date: Option<NaiveDate>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Archive {
    /// Whether the record is currently lent out.
    pub fn is_borrowed(&self) -> bool {
        self.borrow_state == BorrowState::Borrowed
    }
}

/// Data required to insert a new archive record.
///
/// `group_permission` is filled in by the service from the owning folder;
/// callers never choose it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArchive {
    /// Document number.
    pub file_no: String,
    /// Document title.
    pub title: String,
    /// Contract number.
    pub contract_no: String,
    /// Institution number.
    pub inst_no: String,
    /// Archive type.
    pub arc_type: String,
    /// Owning folder.
    pub folder_id: FolderId,
    /// Creator.
    pub creator_id: UserId,
    /// Inherited permission labels.
    pub group_permission: PermissionSet,
    /// Storage date.
    pub storage_date: Option<NaiveDate>,
}

/// Field changes for an existing record. `None` leaves a field untouched.
///
/// Borrow state, folder, and permission are deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateArchive {
    /// New document number.
    pub file_no: Option<String>,
    /// New title.
    pub title: Option<String>,
    /// New contract number.
    pub contract_no: Option<String>,
    /// New institution number.
    pub inst_no: Option<String>,
    /// New archive type.
    pub arc_type: Option<String>,
    /// New storage date.
    pub storage_date: Option<NaiveDate>,
}

impl UpdateArchive {
    /// Whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.file_no.is_none()
            && self.title.is_none()
            && self.contract_no.is_none()
            && self.inst_no.is_none()
            && self.arc_type.is_none()
            && self.storage_date.is_none()
    }

    /// Apply the changes to an in-memory record.
    pub fn apply_to(&self, archive: &mut Archive) {
        if let Some(v) = &self.file_no {
            archive.file_no = v.clone();
        }
        if let Some(v) = &self.title {
            archive.title = v.clone();
        }
        if let Some(v) = &self.contract_no {
            archive.contract_no = v.clone();
        }
        if let Some(v) = &self.inst_no {
            archive.inst_no = v.clone();
        }
        if let Some(v) = &self.arc_type {
            archive.arc_type = v.clone();
        }
        if let Some(v) = self.storage_date {
            archive.storage_date = Some(v);
        }
    }
}

/// Optional predicates for listing archives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveFilter {
    /// Substring of the contract number.
    pub contract_no: Option<String>,
    /// Exact archive type.
    pub arc_type: Option<String>,
    /// Exact institution number.
    pub inst_no: Option<String>,
    /// Exact borrow state.
    pub borrow_state: Option<BorrowState>,
}

impl ArchiveFilter {
    /// Whether a record passes every predicate that is set.
    pub fn matches(&self, archive: &Archive) -> bool {
        self.contract_no
            .as_deref()
            .is_none_or(|needle| archive.contract_no.contains(needle))
            && self
                .arc_type
                .as_deref()
                .is_none_or(|t| archive.arc_type == t)
            && self.inst_no.as_deref().is_none_or(|i| archive.inst_no == i)
            && self.borrow_state.is_none_or(|s| archive.borrow_state == s)
    }
}
