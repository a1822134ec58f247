//! # archivehub-cli
//!
//! Command definitions, CSV input and table/JSON output for the
//! `archivehub` binary.

pub mod commands;
pub mod input;
pub mod output;

pub use commands::Cli;
