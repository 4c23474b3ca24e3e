//! Client error types
//!
//! Errors raised while fetching a further page of submission history.

use thiserror::Error;

/// Errors for history page fetches and merges
#[derive(Error, Debug)]
pub enum PagerError {
    /// Transport failure talking to the GraphQL endpoint
    #[error("Fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The server answered with GraphQL errors
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQL(Vec<String>),

    /// The response carried no history edge to prepend
    #[error("History page for submission {submission_id} before {cursor} was empty")]
    EmptyPage {
        submission_id: String,
        cursor: String,
    },

    /// The response body did not match the expected shape
    #[error("Could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type PagerResult<T> = Result<T, PagerError>;
