//! HTTP error handling: maps [`RepositoryError`] and HTTP-layer failures
//! (bad multipart bodies, missing routes) to the status codes in spec.md
//! §7 and §4.G.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nuget_repo_domain::RepositoryError;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced at the HTTP edge.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A domain/registry-core failure, carrying its own status mapping.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The request body was not a well-formed multipart body, or its first
    /// part could not be read.
    #[error("malformed multipart body: {0}")]
    MalformedMultipart(String),

    /// The multipart body had no parts.
    #[error("multipart body had no parts")]
    EmptyMultipart,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Repository(err) => {
                StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::MalformedMultipart(_) | ApiError::EmptyMultipart => StatusCode::BAD_REQUEST,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::Repository(err) => err.code(),
            ApiError::MalformedMultipart(_) => "InvalidPackage",
            ApiError::EmptyMultipart => "InvalidPackage",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
