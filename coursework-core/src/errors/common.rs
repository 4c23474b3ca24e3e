//! Conversion of domain errors into GraphQL errors
//!
//! Every error carries a `code` extension so clients can branch without
//! parsing messages.

#[cfg(feature = "graphql")]
use async_graphql::{Error as GraphQLError, ErrorExtensions};

#[cfg(feature = "graphql")]
use super::*;

/// Convert domain errors to GraphQL errors with error codes
#[cfg(feature = "graphql")]
pub trait ToGraphQLError {
    fn to_graphql_error(&self) -> GraphQLError;
}

#[cfg(feature = "graphql")]
impl ToGraphQLError for SubmissionError {
    fn to_graphql_error(&self) -> GraphQLError {
        let code = self.error_code();

        GraphQLError::new(self.to_string()).extend_with(|_, e| {
            e.set("code", code);

            match self {
                SubmissionError::NotFound(id)
                | SubmissionError::AssignmentNotFound(id)
                | SubmissionError::UserNotFound(id) => {
                    e.set("id", *id);
                }
                SubmissionError::InvalidCursor(cursor) => {
                    e.set("cursor", cursor.as_str());
                }
                SubmissionError::InvalidPageArgument { argument, .. } => {
                    e.set("argument", argument.as_str());
                }
                _ => {}
            }
        })
    }
}

#[cfg(feature = "graphql")]
impl ToGraphQLError for CoreError {
    fn to_graphql_error(&self) -> GraphQLError {
        let code = self.kind().code();
        let fields = self.fields().cloned();

        GraphQLError::new(self.message().to_string()).extend_with(move |_, e| {
            e.set("code", code);
            if let Some(fields) = &fields {
                for (key, value) in fields {
                    e.set(key.as_str(), value.as_str());
                }
            }
        })
    }
}

/// Extension trait for mapping domain results at the GraphQL boundary
#[cfg(feature = "graphql")]
pub trait ResultExt<T> {
    fn map_gql_err(self) -> async_graphql::Result<T>;
}

#[cfg(feature = "graphql")]
impl<T, E: ToGraphQLError> ResultExt<T> for Result<T, E> {
    fn map_gql_err(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.to_graphql_error())
    }
}
