//! Server configuration.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Runtime configuration for the repository server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port to bind to.
    pub port: u16,

    /// Directory backing the filesystem blob store.
    pub storage_root: String,

    /// Base URL this server is reachable at, used to build absolute
    /// `packageContent` and catalog URLs in registration responses.
    pub public_base_url: String,

    /// CORS allowed origins.
    pub cors_allowed_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Log level.
    pub log_level: String,

    /// Use JSON log formatting instead of pretty-printed.
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            storage_root: "./data".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
            max_body_size: 256 * 1024 * 1024, // 256 MB, generous for nupkgs
            request_timeout_seconds: 30,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration layering (lowest to highest precedence): built-in
    /// defaults, an optional `config/nuget-repo.{toml,yaml,json}` file, and
    /// `NUGET_REPO_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = ServerConfig::default();

        let builder = config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port as i64)?
            .set_default("storage_root", defaults.storage_root)?
            .set_default("public_base_url", defaults.public_base_url)?
            .set_default("cors_allowed_origins", defaults.cors_allowed_origins)?
            .set_default("max_body_size", defaults.max_body_size as i64)?
            .set_default(
                "request_timeout_seconds",
                defaults.request_timeout_seconds as i64,
            )?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_json", defaults.log_json)?
            .add_source(config::File::with_name("config/nuget-repo").required(false))
            .add_source(
                config::Environment::with_prefix("NUGET_REPO")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true),
            );

        builder
            .build()
            .context("failed to assemble server configuration")?
            .try_deserialize()
            .context("failed to parse server configuration")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
