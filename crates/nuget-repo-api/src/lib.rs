//! Axum HTTP surface for the NuGet package repository.
//!
//! Wires the publish and read-side metadata endpoints (spec.md §4.G, §6)
//! on top of [`nuget_repo_registry::Repository`], plus the ambient
//! concerns (health checks, CORS, tracing, request body limits) a
//! runnable service needs but which the ingestion core itself does not
//! specify.

pub mod app;
pub mod content_location;
pub mod error;
pub mod routes;
pub mod state;

pub use app::create_app;
pub use state::AppState;
