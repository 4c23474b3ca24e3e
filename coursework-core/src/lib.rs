pub mod errors;

pub mod app_context;
pub use app_context::AppContext;
pub mod auth;
pub mod database;
pub mod services;

#[cfg(feature = "graphql")]
pub mod graphql;
