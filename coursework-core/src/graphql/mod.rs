pub mod context;
pub mod cursor;
pub mod loaders;
pub mod pagination;
pub mod queries;
pub mod schema;
pub mod types;

pub use context::{GraphQLContext, RequestContext};
pub use schema::{build_schema, CourseworkSchema};
