//! Ambient concerns shared by the server binary: configuration loading and
//! structured logging setup.

pub mod config;
pub mod telemetry;

pub use config::ServerConfig;
pub use telemetry::init_tracing;
