//! Error type shared by every ArchiveHub crate.
//!
//! Store, service and CLI code all return [`AppError`]; callers branch on
//! [`ErrorKind`] rather than on message text.

use std::fmt;
use thiserror::Error;

/// What went wrong, independent of where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested folder, record, parent, or user was not found.
    NotFound,
    /// The caller could not be resolved to a known principal.
    Authentication,
    /// The caller's labels do not satisfy the resource's required labels.
    Authorization,
    /// A required field is missing or an argument is out of range.
    Validation,
    /// The requested state transition targets the current state, or a
    /// uniqueness constraint was violated.
    Conflict,
    /// The underlying store failed. Always surfaced, never swallowed.
    Database,
    /// Configuration could not be loaded.
    Configuration,
    /// A value could not be encoded or decoded.
    Serialization,
    /// The operation was cancelled by its caller before completing.
    Cancelled,
    /// A bug or an unexpected environment failure.
    Internal,
}

impl ErrorKind {
    /// Stable code shown to users and written to logs.
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Authentication => "AUTHENTICATION",
            Self::Authorization => "PERMISSION_DENIED",
            Self::Validation => "INVALID_ARGUMENT",
            Self::Conflict => "CONFLICT",
            Self::Database => "STORAGE_FAILURE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Cancelled => "CANCELLED",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An error with a kind, a message for humans, and an optional cause.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// Category used for branching.
    pub kind: ErrorKind,
    /// Message for the operator.
    pub message: String,
    /// Lower-level error, kept for logs.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// One `AppError::<name>(message)` shorthand per kind.
macro_rules! kind_constructors {
    ($($(#[$doc:meta])* $name:ident => $kind:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        )*
    };
}

impl AppError {
    /// An error without an underlying cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// An error wrapping `source`.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(kind, message)
        }
    }

    kind_constructors! {
        /// Missing folder, record, parent or user.
        not_found => NotFound;
        /// Unknown principal.
        authentication => Authentication;
        /// Labels not satisfied.
        authorization => Authorization;
        /// Bad input.
        validation => Validation;
        /// State already reached, or a duplicate.
        conflict => Conflict;
        /// Store failure.
        database => Database;
        /// Bad configuration.
        configuration => Configuration;
        /// Cancelled by the caller.
        cancelled => Cancelled;
        /// Anything else.
        internal => Internal;
    }

    /// Whether this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    /// The cause is not `Clone`; copies keep only kind and message.
    fn clone(&self) -> Self {
        Self::new(self.kind, self.message.clone())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::Serialization, "Malformed JSON", err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O failure: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(ErrorKind::Configuration, format!("Invalid configuration: {err}"), err)
    }
}
