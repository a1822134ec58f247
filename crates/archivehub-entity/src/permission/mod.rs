//! Group permission labels.

pub mod label;

pub use label::{PermissionSet, satisfies};
