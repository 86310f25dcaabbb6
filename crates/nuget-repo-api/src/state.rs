//! Application state shared across all requests.

use std::sync::Arc;

use nuget_repo_common::ServerConfig;
use nuget_repo_registry::Repository;

use crate::content_location::UrlBuilder;

/// Shared state handed to every route handler via Axum's state extraction.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Repository>,
    pub config: Arc<ServerConfig>,
    pub content_location: Arc<UrlBuilder>,
}

impl AppState {
    pub fn new(repository: Arc<Repository>, config: ServerConfig) -> AppState {
        let content_location = Arc::new(UrlBuilder::new(config.public_base_url.clone()));
        AppState {
            repository,
            config: Arc::new(config),
            content_location,
        }
    }
}
