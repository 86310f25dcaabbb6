//! Application builder: assembles routes, middleware, and state into an
//! Axum [`Router`].

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use nuget_repo_common::ServerConfig;
use nuget_repo_registry::Repository;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

/// Build the router: publish, registration, flat-container, and health
/// routes, wrapped in the ambient middleware stack.
pub fn create_app(repository: Arc<Repository>, config: ServerConfig) -> Router {
    let timeout = config.request_timeout();
    let cors = build_cors_layer(&config);
    let body_limit = config.max_body_size;
    let state = AppState::new(repository, config.clone());

    let app = Router::new()
        .merge(routes::health::routes())
        .merge(routes::publish::routes())
        .merge(routes::registration::routes())
        .merge(routes::flatcontainer::routes())
        .with_state(state);

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(CompressionLayer::new())
            .layer(cors)
            .layer(TimeoutLayer::new(timeout)),
    )
}

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new().allow_methods(Any).allow_headers(Any)
    }
}
