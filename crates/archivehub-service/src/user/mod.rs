//! Principal registration and context resolution.

pub mod service;

pub use service::{CreateUserRequest, UserService};
