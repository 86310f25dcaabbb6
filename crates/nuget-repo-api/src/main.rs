//! `nuget-repo-server` binary: loads configuration, wires a
//! [`FilesystemStore`]-backed [`Repository`], and serves the HTTP surface.

use std::sync::Arc;

use nuget_repo_api::create_app;
use nuget_repo_common::{init_tracing, ServerConfig};
use nuget_repo_registry::Repository;
use nuget_repo_storage::{FilesystemStore, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    init_tracing(config.log_json, &config.log_level)?;

    tracing::info!(
        address = %config.server_address(),
        storage_root = %config.storage_root,
        "starting nuget-repo-server"
    );

    let store: Arc<dyn Storage> = Arc::new(FilesystemStore::new(config.storage_root.clone()));
    let repository = Arc::new(Repository::new(store));

    let app = create_app(repository, config.clone());
    let listener = tokio::net::TcpListener::bind(config.server_address()).await?;

    tracing::info!("listening on {}", config.server_address());
    axum::serve(listener, app).await?;

    Ok(())
}
