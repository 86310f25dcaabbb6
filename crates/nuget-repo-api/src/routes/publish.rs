//! `PUT /package` — the push endpoint (spec.md §4.G).
//!
//! `GET /package` needs no handler of its own: axum's router already
//! answers 405 Method Not Allowed for a registered path with no handler
//! for the request's method.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::put;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/package", put(publish))
}

#[derive(Debug, Serialize)]
struct PublishResponse {
    id: String,
    version: String,
}

/// Extract the first part of the multipart body and hand its bytes to
/// [`nuget_repo_registry::Repository::add`] (spec.md §4.G, §4.E).
async fn publish(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<PublishResponse>)> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::MalformedMultipart(e.to_string()))?
        .ok_or(ApiError::EmptyMultipart)?;

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::MalformedMultipart(e.to_string()))?;

    let identity = state.repository.add(bytes).await?;

    Ok((
        StatusCode::CREATED,
        Json(PublishResponse {
            id: identity.id().original().to_string(),
            version: identity.version().normalized(),
        }),
    ))
}
