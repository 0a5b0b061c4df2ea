//! Error handling utilities for the dayone-tools application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use std::io;
use thiserror::Error;

/// Represents specific error cases that can occur when running the Day One CLI.
///
/// The CLI is an external collaborator used for every mutation. Each variant
/// captures the command that was run together with whatever the process told us.
///
/// # Examples
///
/// ```
/// use dayone_tools::errors::CliToolError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "command not found");
/// let error = CliToolError::CommandNotFound {
///     command: "dayone2".to_string(),
///     source: io_error,
/// };
///
/// assert!(format!("{}", error).contains("not found"));
/// assert!(format!("{}", error).contains("dayone2"));
/// ```
///
/// ```
/// use dayone_tools::errors::CliToolError;
///
/// let error = CliToolError::NonZeroExit {
///     command: "dayone2".to_string(),
///     status_code: 1,
///     stderr: "journal not found".to_string(),
/// };
///
/// assert!(format!("{}", error).contains("non-zero status code"));
/// assert!(format!("{}", error).contains("journal not found"));
/// ```
#[derive(Debug, Error)]
pub enum CliToolError {
    /// The CLI executable could not be found.
    #[error("Day One CLI '{command}' not found: {source}. Please install the Day One CLI and make sure it is on your PATH.")]
    CommandNotFound {
        /// The command that was not found
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Permission was denied when executing the CLI.
    #[error("Permission denied when trying to execute Day One CLI '{command}': {source}")]
    PermissionDenied {
        /// The command that had permission denied
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The CLI could not be spawned for another I/O reason.
    #[error("Failed to execute Day One CLI '{command}': {source}")]
    ExecutionFailed {
        /// The command that failed to execute
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The CLI ran but exited with a non-zero status code.
    #[error("Day One CLI '{command}' exited with non-zero status code {status_code}: {stderr}")]
    NonZeroExit {
        /// The command that exited with a non-zero status
        command: String,
        /// The exit status code, or -1 when terminated by a signal
        status_code: i32,
        /// Standard error captured from the process
        stderr: String,
    },

    /// The CLI succeeded but its output did not carry the expected identifier.
    #[error("Day One CLI '{command}' returned unexpected output: {stdout}")]
    UnexpectedOutput {
        /// The command that produced the output
        command: String,
        /// Standard output captured from the process
        stdout: String,
    },
}

/// Represents specific error cases that can occur during database reads.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite engine error.
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Represents all possible errors that can occur in the dayone-tools application.
///
/// This enum is the central error type used across the crate. It uses `thiserror`
/// for deriving the `Error` trait implementation and formatted error messages.
///
/// # Examples
///
/// ```
/// use dayone_tools::errors::AppError;
///
/// let error = AppError::InvalidDate("13-40".to_string());
/// assert!(format!("{}", error).contains("13-40"));
/// ```
///
/// Converting from a SQLite error:
/// ```
/// use dayone_tools::errors::{AppError, DatabaseError};
///
/// let app_error: AppError = rusqlite::Error::InvalidQuery.into();
/// assert!(matches!(app_error, AppError::Database(DatabaseError::Sqlite(_))));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The Day One store is missing or cannot be opened.
    #[error("Day One database unavailable: {0}")]
    StorageUnavailable(String),

    /// A read against the Day One store failed.
    ///
    /// Wraps the engine message; partial results are never returned alongside it.
    #[error("Query failed: {0}")]
    Database(#[from] DatabaseError),

    /// The recurrence query input could not be parsed.
    #[error("Invalid date format: {0}. Use MM-DD or YYYY-MM-DD format.")]
    InvalidDate(String),

    /// The Day One CLI was missing or failed.
    #[error("External tool error: {0}")]
    ExternalTool(#[from] CliToolError),

    /// Caller-supplied input was rejected before any work was done.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested entry does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A result could not be rendered as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Database(DatabaseError::Sqlite(e))
    }
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use dayone_tools::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Validation("Entry content cannot be empty".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
