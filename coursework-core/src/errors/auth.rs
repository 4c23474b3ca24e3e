//! Viewer identity errors
//!
//! Authentication itself happens outside this crate; these errors only cover
//! turning the identity handed to us into a [`Viewer`](crate::auth::Viewer).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The supplied viewer identity is not a user id
    #[error("Invalid viewer id: {0}")]
    InvalidViewerId(String),
}
