//! Error types for serverdesk
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (duplicate server, unknown target, bad argument)
//! - 4: Operation failed (I/O, serialization, lock contention)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the serverdesk CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for serverdesk operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Server already exists: {0}")]
    ServerExists(String),

    #[error("Server not found: {0}")]
    ServerNotFound(String),

    #[error("No server selected")]
    NoServerSelected,

    #[error("{kind} index {index} is out of range (server has {len})")]
    OutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::ServerExists(_)
            | Error::ServerNotFound(_)
            | Error::NoServerSelected
            | Error::OutOfRange { .. }
            | Error::NotFound { .. }
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured context for the JSON error envelope
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::ServerExists(name) | Error::ServerNotFound(name) => {
                Some(serde_json::json!({ "server": name }))
            }
            Error::OutOfRange { kind, index, len } => Some(serde_json::json!({
                "kind": kind,
                "index": index,
                "len": len,
            })),
            Error::NotFound { kind, id } => Some(serde_json::json!({
                "kind": kind,
                "id": id,
            })),
            Error::LockFailed(path) => Some(serde_json::json!({ "path": path })),
            _ => None,
        }
    }
}

/// Result type alias for serverdesk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    /// `user_error` or `operation_failed`
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        let code = err.exit_code();
        JsonError {
            message: err.to_string(),
            code,
            kind: if code == exit_codes::USER_ERROR {
                "user_error"
            } else {
                "operation_failed"
            },
            details: err.details(),
        }
    }
}
