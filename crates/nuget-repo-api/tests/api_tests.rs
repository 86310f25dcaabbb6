//! End-to-end HTTP tests driving the router directly with `tower::Service`,
//! covering the push/registration/flat-container scenarios from
//! spec.md §8 through the real Axum surface rather than the `Repository`
//! API alone.

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use nuget_repo_api::create_app;
use nuget_repo_common::ServerConfig;
use nuget_repo_registry::Repository;
use nuget_repo_storage::{MemoryStore, Storage};
use serde_json::Value;
use tower::ServiceExt;
use zip::write::FileOptions;
use zip::ZipWriter;

fn build_nupkg(id: &str, version: &str) -> Vec<u8> {
    let nuspec = format!(
        "<package><metadata><id>{id}</id><version>{version}</version></metadata></package>"
    );
    let mut buf = Vec::new();
    {
        let cursor = std::io::Cursor::new(&mut buf);
        let mut writer = ZipWriter::new(cursor);
        writer
            .start_file(format!("{id}.nuspec"), FileOptions::default())
            .unwrap();
        writer.write_all(nuspec.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    buf
}

/// Builds a nupkg padded with an uncompressed filler entry so the archive
/// (and the multipart body wrapping it) exceeds `filler_len` bytes on the
/// wire, to exercise the body-size limit rather than the nuspec parser.
fn build_large_nupkg(id: &str, version: &str, filler_len: usize) -> Vec<u8> {
    let nuspec = format!(
        "<package><metadata><id>{id}</id><version>{version}</version></metadata></package>"
    );
    let mut buf = Vec::new();
    {
        let cursor = std::io::Cursor::new(&mut buf);
        let mut writer = ZipWriter::new(cursor);
        let stored = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer.start_file(format!("{id}.nuspec"), stored).unwrap();
        writer.write_all(nuspec.as_bytes()).unwrap();
        writer.start_file("filler.bin", stored).unwrap();
        writer.write_all(&vec![0u8; filler_len]).unwrap();
        writer.finish().unwrap();
    }
    buf
}

fn multipart_body(nupkg_bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "test-boundary-0xdeadbeef";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"package\"; filename=\"package.nupkg\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(nupkg_bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (
        format!("multipart/form-data; boundary={boundary}"),
        body,
    )
}

fn test_app() -> axum::Router {
    let store: Arc<dyn Storage> = Arc::new(MemoryStore::new());
    let repository = Arc::new(Repository::new(store));
    let mut config = ServerConfig::default();
    config.public_base_url = "https://example.test".to_string();
    create_app(repository, config)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn push_then_registration_has_one_leaf() {
    let app = test_app();
    let (content_type, body) = multipart_body(&build_nupkg("foo", "1.0.0"));

    let push_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/package")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(push_response.status(), StatusCode::CREATED);

    let registration_response = app
        .oneshot(
            Request::builder()
                .uri("/registrations/foo/index.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(registration_response.status(), StatusCode::OK);
    let body = body_json(registration_response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["count"], 1);
    assert_eq!(
        body["items"][0]["items"][0]["catalogEntry"]["version"],
        "1.0.0"
    );
    assert_eq!(
        body["items"][0]["items"][0]["packageContent"],
        "https://example.test/v3/flatcontainer/foo/1.0.0/foo.1.0.0.nupkg"
    );
}

#[tokio::test]
async fn duplicate_push_is_conflict() {
    let app = test_app();
    let (content_type, body) = multipart_body(&build_nupkg("foo", "1.0.0"));

    let first = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/package")
                .header("content-type", content_type.clone())
                .body(Body::from(body.clone()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/package")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_package_is_bad_request() {
    let app = test_app();
    let (content_type, body) = multipart_body(b"not a zip file at all");

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/package")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_package_is_method_not_allowed() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/package")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_registration_path_is_not_found() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/registrations/foo/page/0.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn registration_for_unpushed_package_is_empty_not_404() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/registrations/never-pushed/index.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn flatcontainer_serves_version_index_and_content() {
    let app = test_app();
    let (content_type, body) = multipart_body(&build_nupkg("foo", "1.0.0"));
    app.clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/package")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let index_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v3/flatcontainer/foo/index.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(index_response.status(), StatusCode::OK);
    let index_body = body_json(index_response).await;
    assert_eq!(index_body["versions"][0], "1.0.0");

    let content_response = app
        .oneshot(
            Request::builder()
                .uri("/v3/flatcontainer/foo/1.0.0/foo.1.0.0.nupkg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(content_response.status(), StatusCode::OK);
}

#[tokio::test]
async fn push_accepts_bodies_larger_than_axums_default_limit() {
    let app = test_app();
    // Axum 0.7 defaults to a 2 MiB request body limit; a real .nupkg
    // routinely exceeds that, so pad this one past it and confirm the
    // configured `max_body_size` is actually wired into the router.
    let nupkg = build_large_nupkg("bigpkg", "1.0.0", 3 * 1024 * 1024);
    assert!(nupkg.len() > 2 * 1024 * 1024);
    let (content_type, body) = multipart_body(&nupkg);

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/package")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}
