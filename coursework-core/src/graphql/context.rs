use std::sync::Arc;

use async_graphql::Context;

use crate::app_context::AppContext;
use crate::auth::Viewer;
use crate::graphql::loaders::LoaderStats;

/// Schema-wide data shared by every request.
#[derive(Clone)]
pub struct GraphQLContext {
    pub app: AppContext,
    pub loader_stats: Arc<LoaderStats>,
}

impl GraphQLContext {
    pub fn new(app: AppContext) -> Self {
        Self {
            app,
            loader_stats: Arc::new(LoaderStats::default()),
        }
    }
}

/// Per-request data; attached to each `async_graphql::Request` by the transport.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestContext {
    pub viewer: Viewer,
}

impl RequestContext {
    pub fn new(viewer: Viewer) -> Self {
        Self { viewer }
    }

    /// Requests that carry no context resolve as anonymous.
    pub fn viewer(ctx: &Context<'_>) -> Viewer {
        ctx.data_opt::<RequestContext>()
            .map(|request| request.viewer)
            .unwrap_or_default()
    }
}
