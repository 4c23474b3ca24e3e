//! Domain-specific error types for coursework-core
//!
//! - **SubmissionError**: submission workflow, history listing and cursor decoding
//! - **AuthError**: turning a request identity into a viewer
//! - **CoreError**: kind-tagged carrier returned by services
//!
//! With the `graphql` feature enabled every error converts into a GraphQL error
//! carrying a `code` extension through [`ToGraphQLError`].
//!
//! Authorisation failures on individual fields are not errors: fields the viewer
//! may not see resolve to `null`.

pub mod auth;
pub mod common;
pub mod core_error;
pub mod submission;

pub use auth::AuthError;
pub use core_error::{CoreError, CoreErrorKind};
pub use submission::SubmissionError;

#[cfg(feature = "graphql")]
pub use common::{ResultExt, ToGraphQLError};

/// Result type alias for service operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type alias for submission operations
pub type SubmissionResult<T> = Result<T, SubmissionError>;

impl From<SubmissionError> for CoreError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::NotFound(id) => CoreError::not_found("Submission", id),
            SubmissionError::AssignmentNotFound(id) => CoreError::not_found("Assignment", id),
            SubmissionError::UserNotFound(id) => CoreError::not_found("User", id),
            SubmissionError::Database(db) => CoreError::from(db),
            other => CoreError::validation(other.to_string()),
        }
    }
}
