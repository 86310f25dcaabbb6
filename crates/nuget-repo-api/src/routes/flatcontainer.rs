//! The two read endpoints SPEC_FULL.md §4.G adds beyond the registration
//! route: version enumeration and package content, matching NuGet's
//! package-base-address resource.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use nuget_repo_domain::{PackageId, PackageIdentity, Version};
use serde::Serialize;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v3/flatcontainer/:id/index.json", get(version_index))
        .route(
            "/v3/flatcontainer/:id/:version/:filename",
            get(package_content),
        )
}

#[derive(Debug, Serialize)]
struct VersionIndex {
    versions: Vec<String>,
}

/// A pass-through of `Repository::versions(id)`, serialized exactly as
/// `versions.json`.
async fn version_index(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<VersionIndex>> {
    let package_id = PackageId::parse(&id)?;
    let versions = state.repository.versions(&package_id).await?;
    Ok(Json(VersionIndex {
        versions: versions.all().iter().map(Version::normalized).collect(),
    }))
}

/// A pass-through of `Repository::content(key)`; 404 when the underlying
/// key is absent or the requested filename doesn't match the identity's
/// `nupkgKey()`.
async fn package_content(
    State(state): State<AppState>,
    Path((id, version, filename)): Path<(String, String, String)>,
) -> ApiResult<Response> {
    let package_id = PackageId::parse(&id)?;
    let parsed_version = Version::parse(&version)?;
    let identity = PackageIdentity::new(package_id, parsed_version);

    let expected_filename = format!(
        "{}.{}.nupkg",
        identity.id().normalized(),
        identity.version().normalized()
    );
    if filename.to_lowercase() != expected_filename {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    match state.repository.content(&identity.nupkg_key()).await? {
        Some(bytes) => Ok((
            [(header::CONTENT_TYPE, "application/octet-stream")],
            bytes,
        )
            .into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}
