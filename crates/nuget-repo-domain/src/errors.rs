//! Shared error hierarchy for the package repository core.

use thiserror::Error;

/// Errors that can occur while ingesting or serving packages.
///
/// Each variant maps to exactly one HTTP status at the API edge; see
/// [`RepositoryError::http_status`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The pushed archive, its manifest, or its version string failed validation.
    #[error("invalid package: {0}")]
    InvalidPackage(String),

    /// A version grammar violation, a specific subcategory of [`RepositoryError::InvalidPackage`].
    #[error("invalid version: {0}")]
    InvalidVersion(String),

    /// An artifact already exists under the identity's root key.
    #[error("version already exists: {0}")]
    VersionAlreadyExists(String),

    /// A read was attempted for an identity with no stored nuspec.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any blob-store failure.
    #[error("storage error: {0}")]
    IOError(String),
}

impl RepositoryError {
    /// The error code surfaced in the error variant name, stable for clients and logs.
    pub fn code(&self) -> &'static str {
        match self {
            RepositoryError::InvalidPackage(_) => "InvalidPackage",
            RepositoryError::InvalidVersion(_) => "InvalidVersion",
            RepositoryError::VersionAlreadyExists(_) => "VersionAlreadyExists",
            RepositoryError::NotFound(_) => "NotFound",
            RepositoryError::IOError(_) => "IOError",
        }
    }

    /// The HTTP status this error maps to at the API edge, per spec §7.
    pub fn http_status(&self) -> u16 {
        match self {
            RepositoryError::InvalidPackage(_) => 400,
            RepositoryError::InvalidVersion(_) => 400,
            RepositoryError::VersionAlreadyExists(_) => 409,
            RepositoryError::NotFound(_) => 404,
            RepositoryError::IOError(_) => 500,
        }
    }
}

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;
