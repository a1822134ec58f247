//! Integration tests across services and stores.

mod helpers;

mod access_test;
mod audit_test;
mod borrow_test;
mod import_test;
mod postgres_test;
mod tree_test;
