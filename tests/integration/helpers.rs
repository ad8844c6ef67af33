use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{path::PathBuf, sync::Arc};
use tower::ServiceExt;
use uuid::Uuid;
use vendor_zones::{
    config::Config,
    infrastructure::{
        reference_data::{loader::load_reference_data, store::ReferenceStore},
        repositories::in_memory_draft_repository::InMemoryDraftRepository,
    },
    presentation::http::{routes::create_router, state::AppState},
};

fn data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

fn build_app(reference: ReferenceStore) -> Router {
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Config::default()
    };
    let state = AppState::new(config, reference, Arc::new(InMemoryDraftRepository::new()));
    create_router(state)
}

/// App backed by the bundled reference datasets.
pub async fn spawn_app() -> Router {
    let data = load_reference_data(&data_path("pincodes.csv"), &data_path("zone_blueprint.json"))
        .await
        .expect("bundled reference data should load");
    build_app(ReferenceStore::ready(data))
}

/// App whose reference data never finishes loading.
pub fn spawn_loading_app() -> Router {
    build_app(ReferenceStore::new())
}

pub async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn read_json<T: DeserializeOwned>(res: axum::response::Response) -> T {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("failed to parse json")
}

pub async fn read_text(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("invalid utf8")
}

pub async fn expect_status(
    res: axum::response::Response,
    expected: StatusCode,
) -> axum::response::Response {
    let actual = res.status();
    if actual == expected {
        return res;
    }

    let body = read_text(res).await;
    panic!(
        "HTTP status mismatch. Expected {}, got {}. Response body: {}",
        expected, actual, body
    );
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn multipart_upload_body(
    file_name: &str,
    file_bytes: &[u8],
    fields: &[(&str, &str)],
) -> (String, Vec<u8>) {
    let boundary = format!("----zone-boundary-{}", Uuid::now_v7());
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    (boundary, body)
}

pub fn upload_request(file_name: &str, file_bytes: &[u8], fields: &[(&str, &str)]) -> Request<Body> {
    let (boundary, body) = multipart_upload_body(file_name, file_bytes, fields);
    Request::builder()
        .method("POST")
        .uri("/api/v1/zones/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("failed to build upload request")
}
