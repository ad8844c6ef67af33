use super::helpers::{expect_status, get, read_json, send, spawn_app};
use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn health_reports_loaded_reference_data() {
    let app = spawn_app().await;
    let res = expect_status(send(&app, get("/health")).await, StatusCode::OK).await;
    let health: Value = read_json(res).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["referenceData"], "ready");
}

#[tokio::test]
async fn catalog_lists_regions_in_display_order() {
    let app = spawn_app().await;
    let res = expect_status(send(&app, get("/api/v1/zones/catalog")).await, StatusCode::OK).await;
    let catalog: Value = read_json(res).await;
    assert_eq!(catalog["regions"][0]["region"], "North");
    assert_eq!(catalog["regions"][0]["zones"], json!(["N1", "N2", "N3"]));
}

#[tokio::test]
async fn states_filter_by_region() {
    let app = spawn_app().await;
    let res = expect_status(
        send(&app, get("/api/v1/reference/states?region=North")).await,
        StatusCode::OK,
    )
    .await;
    let states: Vec<String> = read_json(res).await;
    assert!(states.contains(&"DELHI".to_string()));
    assert!(!states.contains(&"KARNATAKA".to_string()));

    let res = send(&app, get("/api/v1/reference/states?region=Atlantis")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_state_has_no_cities() {
    let app = spawn_app().await;
    let res = send(&app, get("/api/v1/reference/cities?state=Narnia")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pincode_lookup_normalizes_input() {
    let app = spawn_app().await;
    let res = expect_status(
        send(&app, get("/api/v1/reference/pincodes/110001.0")).await,
        StatusCode::OK,
    )
    .await;
    let record: Value = read_json(res).await;
    assert_eq!(record["pincode"], "110001");

    let res = send(&app, get("/api/v1/reference/pincodes/123")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let res = send(&app, get("/api/v1/reference/pincodes/999999")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn border_city_resolves_to_both_zones() {
    let app = spawn_app().await;
    let res = expect_status(
        send(&app, get("/api/v1/blueprint/resolve?city=Panchkula&state=Haryana")).await,
        StatusCode::OK,
    )
    .await;
    let resolved: Value = read_json(res).await;
    assert_eq!(resolved["candidates"], json!(["N1", "N2"]));
    assert_eq!(resolved["zone"], "N1");
    assert_eq!(resolved["region"], "North");
}

#[tokio::test]
async fn state_lists_its_zones_primary_first() {
    let app = spawn_app().await;
    let res = expect_status(
        send(&app, get("/api/v1/blueprint/states/delhi/zones")).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["zones"], json!(["N1", "N2"]));
    assert_eq!(body["region"], "North");

    let res = send(&app, get("/api/v1/blueprint/states/Atlantis/zones")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let app = spawn_app().await;
    let req = axum::http::Request::builder()
        .uri("/api/v1/zones/catalog")
        .header("x-request-id", "trace-123")
        .body(axum::body::Body::empty())
        .expect("failed to build request");
    let res = send(&app, req).await;
    assert_eq!(res.headers()["x-request-id"], "trace-123");

    let res = send(&app, get("/api/v1/zones/catalog")).await;
    assert!(res.headers().contains_key("x-request-id"));
}
