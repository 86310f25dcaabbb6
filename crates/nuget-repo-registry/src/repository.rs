//! The ingestion orchestrator: stages a pushed package, validates it,
//! enforces uniqueness, and commits its artifacts and version-index update
//! atomically under an exclusive key scope.

use std::sync::Arc;

use bytes::Bytes;
use nuget_repo_domain::{PackageId, PackageIdentity, RepositoryError, RepositoryResult};
use nuget_repo_packaging::{Hash, Nupkg, Nuspec};
use nuget_repo_storage::{KeyedExclusive, Storage};
use uuid::Uuid;

use crate::versions::Versions;

/// Orchestrates package ingestion and the reads that serve the metadata
/// endpoints, per spec.md §4.E.
pub struct Repository {
    store: Arc<dyn Storage>,
    locks: KeyedExclusive,
}

impl Repository {
    pub fn new(store: Arc<dyn Storage>) -> Repository {
        Repository {
            store,
            locks: KeyedExclusive::new(),
        }
    }

    /// Ingest a pushed `.nupkg`'s raw bytes.
    ///
    /// Returns `Ok(identity)` on success, `InvalidPackage` for any parse
    /// failure, `VersionAlreadyExists` if the version is already stored, or
    /// `IOError` for any blob-store failure.
    pub async fn add(&self, content: Bytes) -> RepositoryResult<PackageIdentity> {
        // 1. Stage: write to a fresh random key outside any package
        // namespace, so it cannot collide with a committed artifact — every
        // real key in this store contains a `/`, a bare UUID never does.
        let staged_key = Uuid::new_v4().to_string();
        self.store
            .put(&staged_key, content)
            .await
            .map_err(|e| RepositoryError::IOError(e.to_string()))?;

        match self.add_staged(&staged_key).await {
            Ok(identity) => Ok(identity),
            Err(e) => {
                self.cleanup_best_effort(&staged_key).await;
                Err(e)
            }
        }
    }

    async fn add_staged(&self, staged_key: &str) -> RepositoryResult<PackageIdentity> {
        // 2. Read back.
        let bytes = self
            .store
            .get(staged_key)
            .await
            .map_err(|e| RepositoryError::IOError(e.to_string()))?;
        let nupkg = Nupkg::new(bytes.to_vec());

        // 3. Extract identity. Any parse failure maps to InvalidPackage.
        let nuspec = nupkg.nuspec()?;
        let identity = nuspec.identity()?;

        // 4. Pre-check uniqueness (optimization; authoritative check is
        // redone inside the exclusive scope below).
        let existing = self
            .store
            .list(&identity.root_key())
            .await
            .map_err(|e| RepositoryError::IOError(e.to_string()))?;
        if !existing.is_empty() {
            return Err(RepositoryError::VersionAlreadyExists(identity.root_key()));
        }

        let package_id = identity.id().clone();
        let hash = Hash::compute(nupkg.bytes());

        // 5. Commit under the exclusive scope keyed by the package's root,
        // serializing concurrent writers to the same package's namespace.
        let store = self.store.clone();
        let staged_key = staged_key.to_string();
        let nuspec_bytes = Bytes::from(nuspec.bytes().to_vec());
        let nupkg_key = identity.nupkg_key();
        let nuspec_key = identity.nuspec_key();
        let hash_key = identity.hash_key();
        let root_key = identity.root_key();
        let versions_key = package_id.versions_key();
        let version = identity.version().clone();

        self.locks
            .exclusively(&package_id.root_key(), move || async move {
                commit(
                    store,
                    &staged_key,
                    &nupkg_key,
                    &nuspec_key,
                    &hash_key,
                    &root_key,
                    &versions_key,
                    nuspec_bytes,
                    hash,
                    version,
                )
                .await
            })
            .await?;

        Ok(identity)
    }

    /// Arbitrary key lookup for raw byte service, used by the
    /// package-content endpoint. `None` if the key is missing.
    pub async fn content(&self, key: &str) -> RepositoryResult<Option<Bytes>> {
        match self.store.get(key).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(nuget_repo_storage::StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(RepositoryError::IOError(e.to_string())),
        }
    }

    /// The stored versions of `id`, empty if none have ever been pushed.
    pub async fn versions(&self, id: &PackageId) -> RepositoryResult<Versions> {
        match self.store.get(&id.versions_key()).await {
            Ok(bytes) => Versions::load(Some(&bytes)),
            Err(nuget_repo_storage::StorageError::NotFound(_)) => Ok(Versions::empty()),
            Err(e) => Err(RepositoryError::IOError(e.to_string())),
        }
    }

    /// The stored `.nuspec` for an identity. `NotFound` if never pushed.
    pub async fn nuspec(&self, identity: &PackageIdentity) -> RepositoryResult<Nuspec> {
        match self.store.get(&identity.nuspec_key()).await {
            Ok(bytes) => Ok(Nuspec::new(bytes.to_vec())),
            Err(nuget_repo_storage::StorageError::NotFound(_)) => {
                Err(RepositoryError::NotFound(identity.nuspec_key()))
            }
            Err(e) => Err(RepositoryError::IOError(e.to_string())),
        }
    }

    async fn cleanup_best_effort(&self, staged_key: &str) {
        if let Err(e) = self.store.delete(staged_key).await {
            tracing::warn!(staged_key, error = %e, "failed to clean up staged blob");
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn commit(
    store: Arc<dyn Storage>,
    staged_key: &str,
    nupkg_key: &str,
    nuspec_key: &str,
    hash_key: &str,
    root_key: &str,
    versions_key: &str,
    nuspec_bytes: Bytes,
    hash: Hash,
    version: nuget_repo_domain::Version,
) -> RepositoryResult<()> {
    // a. Re-verify uniqueness inside the scope (TOCTOU guard).
    let existing = store
        .list(root_key)
        .await
        .map_err(|e| RepositoryError::IOError(e.to_string()))?;
    if !existing.is_empty() {
        return Err(RepositoryError::VersionAlreadyExists(root_key.to_string()));
    }

    // b. Load the current index.
    let current = match store.get(versions_key).await {
        Ok(bytes) => Versions::load(Some(&bytes))?,
        Err(nuget_repo_storage::StorageError::NotFound(_)) => Versions::empty(),
        Err(e) => return Err(RepositoryError::IOError(e.to_string())),
    };

    // c. Commit artifacts. The index is written last so a reader who
    // observes a version there is guaranteed to find its nupkg/nuspec/hash.
    let commit_artifacts = async {
        store
            .move_key(staged_key, nupkg_key)
            .await
            .map_err(|e| RepositoryError::IOError(e.to_string()))?;
        store
            .put(hash_key, Bytes::from(hash.to_base64().into_bytes()))
            .await
            .map_err(|e| RepositoryError::IOError(e.to_string()))?;
        store
            .put(nuspec_key, nuspec_bytes)
            .await
            .map_err(|e| RepositoryError::IOError(e.to_string()))?;
        Ok::<(), RepositoryError>(())
    };

    if let Err(e) = commit_artifacts.await {
        cleanup_partial(&store, root_key).await;
        return Err(e);
    }

    // d. Compute and write the updated index.
    let updated = current.add(version);
    if let Err(e) = store
        .put(versions_key, Bytes::from(updated.to_json_bytes()))
        .await
    {
        cleanup_partial(&store, root_key).await;
        return Err(RepositoryError::IOError(e.to_string()));
    }

    Ok(())
}

async fn cleanup_partial(store: &Arc<dyn Storage>, root_key: &str) {
    match store.list(root_key).await {
        Ok(keys) => {
            for key in keys {
                if let Err(e) = store.delete(&key).await {
                    tracing::warn!(key, error = %e, "failed to clean up partially written key");
                }
            }
        }
        Err(e) => {
            tracing::warn!(root_key, error = %e, "failed to list keys for cleanup");
        }
    }
}
