//! `GET /registrations/{id}/index.json` — the registration view
//! (spec.md §4.F, §6). Any other `/registrations/...` path falls through
//! to axum's default 404, since no other route under this prefix exists.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use nuget_repo_domain::PackageId;
use nuget_repo_registry::{build_registration_index, RegistrationEntry, RegistrationIndex};

use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/registrations/:id/index.json", get(registration_index))
}

async fn registration_index(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RegistrationIndex>> {
    let package_id = PackageId::parse(&id)?;
    let versions = state.repository.versions(&package_id).await?;

    let mut entries = Vec::with_capacity(versions.all().len());
    for version in versions.all() {
        let identity =
            nuget_repo_domain::PackageIdentity::new(package_id.clone(), version.clone());
        let nuspec = state.repository.nuspec(&identity).await?;
        let display_id = nuspec.package_id()?.original().to_string();
        entries.push(RegistrationEntry {
            display_id,
            normalized_version: version.normalized(),
        });
    }

    let index = build_registration_index(&entries, state.content_location.as_ref());
    Ok(Json(index))
}
