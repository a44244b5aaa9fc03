//! End-to-end tests: the real router against a mock GitHub API that serves
//! both the release listing and the asset bytes.

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use flate2::Compression;
use flate2::write::GzEncoder;
use getbin::asset::MatcherTable;
use getbin::http::{HttpClient, default_client};
use getbin::release::GithubClient;
use getbin::server::{AppState, router};
use serde_json::json;
use tower::ServiceExt;

fn state_for(api_url: &str) -> AppState {
    let http = HttpClient::new(default_client().unwrap());
    AppState {
        github: GithubClient::new(http.clone(), api_url),
        fetcher: http,
        matchers: Arc::new(MatcherTable::default()),
    }
}

async fn get(state: AppState, uri: &str, user_agent: &str) -> axum::response::Response {
    let request = Request::builder()
        .uri(uri)
        .header(header::USER_AGENT, user_agent)
        .body(Body::empty())
        .unwrap();
    router(state).oneshot(request).await.unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// A release listing whose asset URLs point back at the mock server.
fn listing_json(base: &str) -> String {
    json!([
        {
            "tag_name": "v1.2.0",
            "assets": [
                {
                    "browser_download_url": format!("{base}/assets/tool-darwin-x86.tar.gz"),
                    "content_type": "application/x-gzip"
                },
                {
                    "browser_download_url": format!("{base}/assets/tool-linux-x86.tar.gz"),
                    "content_type": "application/x-gzip"
                },
                {
                    "browser_download_url": format!("{base}/assets/tool-linux-arm64.tar.gz"),
                    "content_type": "application/x-gzip"
                },
                {
                    "browser_download_url": format!("{base}/assets/tool-windows-amd64.zip"),
                    "content_type": "application/zip"
                }
            ]
        },
        {"tag_name": "v1.1.0", "assets": []}
    ])
    .to_string()
}

fn make_tar_gz(name: &str, content: &[u8]) -> Vec<u8> {
    let enc = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(enc);

    let mut header = tar::Header::new_gnu();
    header.set_path(name).unwrap();
    header.set_size(content.len() as u64);
    header.set_cksum();
    builder.append(&header, content).unwrap();

    builder.into_inner().unwrap().finish().unwrap()
}

fn make_zip(name: &str, content: &[u8]) -> Vec<u8> {
    use zip::CompressionMethod;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options: FileOptions<()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);
    writer.start_file(name, options).unwrap();
    writer.write_all(content).unwrap();
    writer.finish().unwrap().into_inner()
}

#[tokio::test]
async fn test_redirect_with_explicit_platform() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let listing = server
        .mock("GET", "/repos/owner/repo/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_json(&base))
        .create_async()
        .await;

    let response = get(
        state_for(&base),
        "/owner/repo?os=linux&arch=arm64",
        "curl/8.5.0",
    )
    .await;

    listing.assert_async().await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("{base}/assets/tool-linux-arm64.tar.gz")
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"tool-linux-arm64.tar.gz\""
    );
}

#[tokio::test]
async fn test_redirect_infers_os_from_user_agent() {
    // No query parameters: darwin comes from the User-Agent, arch falls
    // back to x86/amd64, so the first asset wins
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    server
        .mock("GET", "/repos/owner/repo/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_json(&base))
        .create_async()
        .await;

    let response = get(state_for(&base), "/owner/repo", "Wget/1.21.2 (darwin21)").await;

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("{base}/assets/tool-darwin-x86.tar.gz")
    );
}

#[tokio::test]
async fn test_explicit_os_overrides_user_agent() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    server
        .mock("GET", "/repos/owner/repo/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_json(&base))
        .create_async()
        .await;

    let response = get(
        state_for(&base),
        "/owner/repo?os=linux",
        "Wget/1.21.2 (darwin21)",
    )
    .await;

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("{base}/assets/tool-linux-x86.tar.gz")
    );
}

#[tokio::test]
async fn test_uncompress_tar_gz() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let content = b"#!/bin/sh\necho i am the binary\n";
    let archive = make_tar_gz("tool", content);

    server
        .mock("GET", "/repos/owner/repo/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_json(&base))
        .create_async()
        .await;
    let asset = server
        .mock("GET", "/assets/tool-linux-x86.tar.gz")
        .with_status(200)
        .with_body(archive)
        .create_async()
        .await;

    let response = get(
        state_for(&base),
        "/owner/repo?os=linux&arch=x86&uncompress=true",
        "curl/8.5.0",
    )
    .await;

    asset.assert_async().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"tool\""
    );
    assert_eq!(
        response.headers()[header::CONTENT_LENGTH],
        content.len().to_string().as_str()
    );
    assert_eq!(body_bytes(response).await, content);
}

#[tokio::test]
async fn test_uncompress_zip() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let content = b"MZ\x90\x00 windows binary bytes";
    let archive = make_zip("tool.exe", content);

    server
        .mock("GET", "/repos/owner/repo/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_json(&base))
        .create_async()
        .await;
    let asset = server
        .mock("GET", "/assets/tool-windows-amd64.zip")
        .with_status(200)
        .with_body(archive)
        .create_async()
        .await;

    let response = get(
        state_for(&base),
        "/owner/repo?os=windows&uncompress=1",
        "curl/8.5.0",
    )
    .await;

    asset.assert_async().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"tool.exe\""
    );
    assert_eq!(
        response.headers()[header::CONTENT_LENGTH],
        content.len().to_string().as_str()
    );
    assert_eq!(body_bytes(response).await, content);
}

#[tokio::test]
async fn test_no_releases_is_bad_request() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    server
        .mock("GET", "/repos/owner/repo/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let response = get(state_for(&base), "/owner/repo", "curl/8.5.0").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("No GitHub releases"));
}

#[tokio::test]
async fn test_no_matching_asset_is_bad_request() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    server
        .mock("GET", "/repos/owner/repo/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_json(&base))
        .create_async()
        .await;

    // The listing has no windows/arm64 asset
    let response = get(
        state_for(&base),
        "/owner/repo?os=windows&arch=arm64",
        "curl/8.5.0",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_failure_is_server_error() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    server
        .mock("GET", "/repos/owner/repo/releases")
        .with_status(500)
        .create_async()
        .await;

    let response = get(state_for(&base), "/owner/repo", "curl/8.5.0").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_uncompress_unsupported_content_type() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let listing = json!([
        {
            "tag_name": "v1.0.0",
            "assets": [
                {
                    "browser_download_url": format!("{base}/assets/tool-linux-amd64.bin"),
                    "content_type": "application/octet-stream"
                }
            ]
        }
    ])
    .to_string();

    server
        .mock("GET", "/repos/owner/repo/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing)
        .create_async()
        .await;

    let response = get(
        state_for(&base),
        "/owner/repo?os=linux&uncompress=true",
        "curl/8.5.0",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("application/octet-stream"));
}

#[tokio::test]
async fn test_uncompress_corrupt_archive_is_server_error() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    server
        .mock("GET", "/repos/owner/repo/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_json(&base))
        .create_async()
        .await;
    server
        .mock("GET", "/assets/tool-linux-x86.tar.gz")
        .with_status(200)
        .with_body("this is not a gzip stream")
        .create_async()
        .await;

    let response = get(
        state_for(&base),
        "/owner/repo?os=linux&arch=x86&uncompress=true",
        "curl/8.5.0",
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_uncompress_asset_fetch_failure_is_server_error() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    server
        .mock("GET", "/repos/owner/repo/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_json(&base))
        .create_async()
        .await;
    server
        .mock("GET", "/assets/tool-linux-x86.tar.gz")
        .with_status(404)
        .create_async()
        .await;

    let response = get(
        state_for(&base),
        "/owner/repo?os=linux&arch=x86&uncompress=true",
        "curl/8.5.0",
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_home_page() {
    let state = state_for("http://unused.invalid");

    let response = get(state, "/", "curl/8.5.0").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("GitHub Release Downloader"));
}
