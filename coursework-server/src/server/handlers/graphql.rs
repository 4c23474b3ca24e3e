use async_graphql::{Request, Response as GraphQLResponse};
use axum::extract::{Json, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse};
use coursework::auth::Viewer;
use coursework::graphql::RequestContext;
use tracing::{debug, warn};

use crate::server::app::AppState;

pub const VIEWER_HEADER: &str = "x-viewer-id";

/// Identity comes from the `x-viewer-id` header; anything unusable means anonymous.
pub fn viewer_from_headers(headers: &HeaderMap) -> Viewer {
    let Some(value) = headers.get(VIEWER_HEADER) else {
        return Viewer::Anonymous;
    };

    let parsed = value
        .to_str()
        .map_err(|e| e.to_string())
        .and_then(|raw| Viewer::from_header_value(raw).map_err(|e| e.to_string()));

    match parsed {
        Ok(viewer) => viewer,
        Err(reason) => {
            warn!("Ignoring {} header: {}", VIEWER_HEADER, reason);
            Viewer::Anonymous
        }
    }
}

pub async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<Request>,
) -> Json<GraphQLResponse> {
    let viewer = viewer_from_headers(&headers);
    debug!("GraphQL request received for {:?}", viewer);

    let response = state
        .graphql_schema
        .execute(req.data(RequestContext::new(viewer)))
        .await;

    debug!("GraphQL request completed with {} errors", response.errors.len());
    Json(response)
}

pub async fn graphql_playground() -> impl IntoResponse {
    Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn viewer_header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(viewer_from_headers(&headers), Viewer::Anonymous);

        headers.insert(VIEWER_HEADER, HeaderValue::from_static("42"));
        assert_eq!(viewer_from_headers(&headers), Viewer::User(42));

        headers.insert(VIEWER_HEADER, HeaderValue::from_static("admin"));
        assert_eq!(viewer_from_headers(&headers), Viewer::Anonymous);
    }
}
