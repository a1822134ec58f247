//! Audited borrow/return transitions.

pub mod batch;
pub mod transition;

pub use batch::BatchReport;
pub use transition::BorrowService;
