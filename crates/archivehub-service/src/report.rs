//! Per-row outcomes shared by import and batch operations.

use serde::{Deserialize, Serialize};

/// One rejected row of a tabular input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    /// Row index in the input. Row 0 is the header.
    pub row: usize,
    /// Contract number on the row, if it had one.
    pub contract_no: String,
    /// Why the row was rejected.
    pub reason: String,
}

impl RowFailure {
    /// Creates a failure entry.
    pub fn new(row: usize, contract_no: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            row,
            contract_no: contract_no.into(),
            reason: reason.into(),
        }
    }
}

/// Cell at `index`, trimmed, or empty when the row is shorter.
pub(crate) fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|s| s.trim()).unwrap_or("")
}
