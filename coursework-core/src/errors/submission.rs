//! Submission error types
//!
//! Errors raised while recording attempts, listing history, or decoding
//! pagination cursors for a submission lineage.
//!
//! # Examples
//!
//! ```rust
//! use coursework::errors::SubmissionError;
//!
//! let err = SubmissionError::InvalidCursor("not-base64".to_string());
//! assert_eq!(err.error_code(), "INVALID_CURSOR");
//! ```

use thiserror::Error;

/// Errors for submission workflow and history operations
#[derive(Error, Debug)]
pub enum SubmissionError {
    /// Submission not found
    #[error("Submission not found: {0}")]
    NotFound(i32),

    /// Assignment not found
    #[error("Assignment not found: {0}")]
    AssignmentNotFound(i32),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(i32),

    /// Cursor could not be decoded into a position
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// Pagination arguments out of range
    #[error("Invalid pagination argument '{argument}': {reason}")]
    InvalidPageArgument { argument: String, reason: String },

    /// A comment was attached to an attempt the submission never reached
    #[error("Attempt {attempt} is beyond the current attempt {current}")]
    AttemptOutOfRange { attempt: i32, current: i32 },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl SubmissionError {
    /// Get error code for GraphQL/API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            SubmissionError::NotFound(_) => "SUBMISSION_NOT_FOUND",
            SubmissionError::AssignmentNotFound(_) => "ASSIGNMENT_NOT_FOUND",
            SubmissionError::UserNotFound(_) => "USER_NOT_FOUND",
            SubmissionError::InvalidCursor(_) => "INVALID_CURSOR",
            SubmissionError::InvalidPageArgument { .. } => "INVALID_PAGE_ARGUMENT",
            SubmissionError::AttemptOutOfRange { .. } => "ATTEMPT_OUT_OF_RANGE",
            SubmissionError::Database(_) => "DATABASE_ERROR",
        }
    }
}
