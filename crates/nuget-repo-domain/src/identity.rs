//! Package identity value types and storage key derivation.

use std::fmt;

use crate::errors::RepositoryError;
use crate::version::Version;

/// A NuGet package id: letters, digits, `.`, `_`, `-`, non-empty.
///
/// Keys and equality always use the lower-cased normalized form; the
/// original casing (as found in a `.nuspec`) is kept for display in JSON
/// responses.
#[derive(Debug, Clone)]
pub struct PackageId {
    original: String,
    normalized: String,
}

impl PackageId {
    /// Validate and construct a `PackageId` from its original-cased form.
    ///
    /// # Example
    /// ```
    /// # use nuget_repo_domain::PackageId;
    /// let id = PackageId::parse("Newtonsoft.Json").unwrap();
    /// assert_eq!(id.original(), "Newtonsoft.Json");
    /// assert_eq!(id.normalized(), "newtonsoft.json");
    /// assert!(PackageId::parse("foo bar").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<PackageId, RepositoryError> {
        if s.is_empty()
            || !s
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'-')
        {
            return Err(RepositoryError::InvalidPackage(format!(
                "invalid package id: {s}"
            )));
        }
        Ok(PackageId {
            original: s.to_string(),
            normalized: s.to_lowercase(),
        })
    }

    /// The casing as found in the source `.nuspec`, for display fields.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The lower-case form used for equality and all storage keys.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// `<id>/` — root of the package's namespace, used for exclusive-scope
    /// locking and listing.
    pub fn root_key(&self) -> String {
        format!("{}/", self.normalized)
    }

    /// `<id>/index.json` — the versions index key.
    pub fn versions_key(&self) -> String {
        format!("{}/index.json", self.normalized)
    }
}

impl PartialEq for PackageId {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for PackageId {}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

/// A (PackageId, Version) pair that uniquely identifies one stored package.
#[derive(Debug, Clone)]
pub struct PackageIdentity {
    id: PackageId,
    version: Version,
}

impl PackageIdentity {
    pub fn new(id: PackageId, version: Version) -> PackageIdentity {
        PackageIdentity { id, version }
    }

    pub fn id(&self) -> &PackageId {
        &self.id
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// `<id>/<version>/` — root of this specific version's artifacts,
    /// used for the pre-check and TOCTOU re-check in the ingestion algorithm.
    pub fn root_key(&self) -> String {
        format!("{}/{}/", self.id.normalized(), self.version.normalized())
    }

    /// `<id>/<version>/<id>.<version>.nupkg`
    pub fn nupkg_key(&self) -> String {
        format!(
            "{}/{}/{}.{}.nupkg",
            self.id.normalized(),
            self.version.normalized(),
            self.id.normalized(),
            self.version.normalized()
        )
    }

    /// `<id>/<version>/<id>.<version>.nuspec`
    pub fn nuspec_key(&self) -> String {
        format!(
            "{}/{}/{}.{}.nuspec",
            self.id.normalized(),
            self.version.normalized(),
            self.id.normalized(),
            self.version.normalized()
        )
    }

    /// `<id>/<version>/<id>.<version>.nupkg.sha512`
    pub fn hash_key(&self) -> String {
        format!(
            "{}/{}/{}.{}.nupkg.sha512",
            self.id.normalized(),
            self.version.normalized(),
            self.id.normalized(),
            self.version.normalized()
        )
    }
}

impl PartialEq for PackageIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.version == other.version
    }
}

impl Eq for PackageIdentity {}
