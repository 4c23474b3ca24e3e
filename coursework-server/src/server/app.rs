use anyhow::{anyhow, Result};
use axum::{routing::get, Router};
use coursework::graphql::{build_schema, CourseworkSchema, GraphQLContext};
use coursework::AppContext;
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{graphql, health};

#[derive(Clone)]
pub struct AppState {
    pub graphql_schema: CourseworkSchema,
}

pub fn create_app(db: DatabaseConnection, cors_origin: Option<&str>) -> Result<Router> {
    let graphql_context = GraphQLContext::new(AppContext::new(db));
    let state = AppState {
        graphql_schema: build_schema(graphql_context),
    };

    let allow_origin = match cors_origin {
        Some(origin) => CorsLayer::new().allow_origin(
            origin
                .parse::<axum::http::HeaderValue>()
                .map_err(|e| anyhow!("Invalid CORS origin: {}", e))?,
        ),
        None => CorsLayer::new().allow_origin(Any),
    };
    let cors = allow_origin
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_credentials(false);

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/graphql",
            get(graphql::graphql_playground)
                .post(graphql::graphql_handler)
                .options(|| async { axum::http::StatusCode::OK }),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    Ok(app)
}
