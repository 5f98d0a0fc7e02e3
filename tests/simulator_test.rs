//! Panel simulator endpoint tests.

mod common;

use axum::http::StatusCode;
use common::{assert_json_error, assert_ok, assert_png, fixtures, TestApp};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    assert_ok(&response);
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_responses_close_connection() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    assert_eq!(
        response.headers.get("connection").and_then(|v| v.to_str().ok()),
        Some("close")
    );
}

#[tokio::test]
async fn test_upload_accepts_packed_frame() {
    let app = TestApp::new();
    let response = app
        .post_file("/upload", "file", "image.bin", &fixtures::packed_frame(0x44))
        .await;
    assert_ok(&response);
    assert_eq!(response.text(), "OK");

    let image = app.store.latest().await.expect("frame stored");
    assert_eq!(image.packed.len(), fixtures::packed_len());
    assert_eq!(image.filename.as_deref(), Some("image.bin"));
    assert_eq!(app.store.upload_count(), 1);
}

#[tokio::test]
async fn test_upload_rejects_wrong_size() {
    let app = TestApp::new();
    let response = app
        .post_file("/upload", "file", "image.bin", &[0x11; 1000])
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST, "Wrong buffer size");
    assert!(app.store.latest().await.is_none());
}

#[tokio::test]
async fn test_upload_requires_file_field() {
    let app = TestApp::new();
    let response = app
        .post_file("/upload", "photo", "image.bin", &fixtures::packed_frame(0))
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST, "file");
}

#[tokio::test]
async fn test_upload_rejects_non_multipart() {
    let app = TestApp::new();
    let response = app
        .post_raw("/upload", "application/octet-stream", fixtures::packed_frame(0))
        .await;
    assert!(response.status.is_client_error(), "got {}", response.status);
}

#[tokio::test]
async fn test_status_before_and_after_upload() {
    let app = TestApp::new();

    let json: serde_json::Value = app.get("/status").await.json();
    assert_eq!(json["width"], 448);
    assert_eq!(json["height"], 600);
    assert_eq!(json["uploads"], 0);
    assert!(json["last_upload"].is_null());

    // Every pixel red (index 4)
    app.post_file("/upload", "file", "image.bin", &fixtures::packed_frame(0x44))
        .await;

    let json: serde_json::Value = app.get("/status").await.json();
    assert_eq!(json["uploads"], 1);
    let last = &json["last_upload"];
    assert_eq!(last["bytes"], 134_400);
    assert_eq!(last["sha256"].as_str().unwrap().len(), 64);
    assert_eq!(
        last["colors"],
        serde_json::json!([0, 0, 0, 0, 268_800, 0, 0])
    );
}

#[tokio::test]
async fn test_panel_png_requires_upload() {
    let app = TestApp::new();
    let response = app.get("/panel.png").await;
    assert_json_error(&response, StatusCode::NOT_FOUND, "Nothing uploaded");
}

#[tokio::test]
async fn test_panel_png_after_upload() {
    let app = TestApp::new();
    app.post_file("/upload", "file", "image.bin", &fixtures::packed_frame(0x12))
        .await;
    let response = app.get("/panel.png").await;
    assert_png(&response);
}
