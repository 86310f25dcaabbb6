//! The per-package versions index: `{"versions": [...]}`, sorted ascending
//! and deduplicated by normalized form.

use nuget_repo_domain::{RepositoryError, Version};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct VersionsDocument {
    versions: Vec<Version>,
}

/// The sorted, deduplicated list of a package's known versions.
#[derive(Debug, Default)]
pub struct Versions {
    versions: Vec<Version>,
}

impl Versions {
    /// An empty index.
    pub fn empty() -> Versions {
        Versions::default()
    }

    /// Parse a `versions.json` document. Absent bytes (`None`) yield an
    /// empty index, matching "no versions" semantics for a package that has
    /// never been pushed to.
    pub fn load(bytes: Option<&[u8]>) -> Result<Versions, RepositoryError> {
        let Some(bytes) = bytes else {
            return Ok(Versions::empty());
        };
        let doc: VersionsDocument = serde_json::from_slice(bytes).map_err(|e| {
            RepositoryError::IOError(format!("corrupt versions index: {e}"))
        })?;
        let mut versions = doc.versions;
        versions.sort();
        versions.dedup_by(|a, b| a.normalized() == b.normalized());
        Ok(Versions { versions })
    }

    /// A new index containing the existing versions plus `v`, deduplicated
    /// by normalized form and sorted ascending.
    pub fn add(&self, v: Version) -> Versions {
        let mut versions: Vec<Version> = self
            .versions
            .iter()
            .filter(|existing| existing.normalized() != v.normalized())
            .cloned()
            .collect();
        versions.push(v);
        versions.sort();
        Versions { versions }
    }

    /// The sorted list of versions.
    pub fn all(&self) -> &[Version] {
        &self.versions
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Serialize as `{"versions": [...]}`.
    pub fn to_json_bytes(&self) -> Vec<u8> {
        let doc = VersionsDocument {
            versions: self.versions.clone(),
        };
        serde_json::to_vec(&doc).expect("versions document always serializes")
    }
}
