use super::helpers::{
    expect_status, get, json_request, read_json, send, spawn_app, spawn_loading_app,
};
use axum::{Router, http::StatusCode};
use serde_json::{Value, json};

async fn create_draft(app: &Router) -> String {
    let res = expect_status(
        send(app, json_request("POST", "/api/v1/drafts", json!({ "vendorId": "acme" }))).await,
        StatusCode::CREATED,
    )
    .await;
    let draft: Value = read_json(res).await;
    draft["id"].as_str().expect("missing draft id").to_string()
}

async fn select(app: &Router, id: &str, zone: &str) -> axum::response::Response {
    send(
        app,
        json_request(
            "POST",
            &format!("/api/v1/drafts/{}/zones/{}/select", id, zone),
            json!({}),
        ),
    )
    .await
}

async fn auto_fill(app: &Router, id: &str) -> Value {
    let res = expect_status(
        send(
            app,
            json_request("POST", &format!("/api/v1/drafts/{}/auto-fill", id), json!({})),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    read_json(res).await
}

fn zone<'a>(draft: &'a Value, code: &str) -> &'a Value {
    draft["zones"]
        .as_array()
        .expect("zones should be an array")
        .iter()
        .find(|z| z["zoneCode"] == code)
        .unwrap_or_else(|| panic!("zone {} missing from draft", code))
}

fn cities(zone: &Value) -> Vec<String> {
    zone["selectedCities"]
        .as_array()
        .expect("selectedCities should be an array")
        .iter()
        .filter_map(|c| c.as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn sequential_region_rejects_skipped_zone() {
    let app = spawn_app().await;
    let id = create_draft(&app).await;

    let res = expect_status(select(&app, &id, "N2").await, StatusCode::CONFLICT).await;
    let body: Value = read_json(res).await;
    assert!(body["error"].as_str().is_some_and(|e| e.contains("N1")));

    expect_status(select(&app, &id, "N1").await, StatusCode::OK).await;
    let res = expect_status(select(&app, &id, "N2").await, StatusCode::OK).await;
    let draft: Value = read_json(res).await;
    assert_eq!(draft["selected"], json!(["N1", "N2"]));
}

#[tokio::test]
async fn auto_fill_gives_limited_zone_its_capital_only() {
    let app = spawn_app().await;
    let id = create_draft(&app).await;
    expect_status(select(&app, &id, "N1").await, StatusCode::OK).await;
    expect_status(select(&app, &id, "N2").await, StatusCode::OK).await;

    let body = auto_fill(&app, &id).await;
    assert_eq!(body["changed"]["filled"], 2);
    assert_eq!(body["changed"]["empty"], 0);

    let draft = &body["draft"];
    assert_eq!(cities(zone(draft, "N1")), vec!["NEW DELHI||DELHI"]);

    let n2 = cities(zone(draft, "N2"));
    assert!(!n2.contains(&"NEW DELHI||DELHI".to_string()));
    assert!(n2.contains(&"GURUGRAM||HARYANA".to_string()));
    assert!(n2.contains(&"FARIDABAD||HARYANA".to_string()));
    assert_eq!(draft["activeZones"], json!(["N1", "N2"]));
}

#[tokio::test]
async fn city_cannot_be_assigned_to_two_zones() {
    let app = spawn_app().await;
    let id = create_draft(&app).await;
    expect_status(select(&app, &id, "N1").await, StatusCode::OK).await;
    expect_status(select(&app, &id, "N2").await, StatusCode::OK).await;

    let assign = |zone: &str| {
        json_request(
            "POST",
            &format!("/api/v1/drafts/{}/zones/{}/cities", id, zone),
            json!({ "cities": ["New Delhi||Delhi"] }),
        )
    };
    let res = expect_status(send(&app, assign("N2")).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["changed"], 1);

    let res = send(&app, assign("N1")).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = expect_status(
        send(&app, get(&format!("/api/v1/drafts/{}/zones/N1/available-cities", id))).await,
        StatusCode::OK,
    )
    .await;
    let available: Vec<String> = read_json(res).await;
    assert!(available.is_empty());
}

#[tokio::test]
async fn mismatched_paste_leaves_matrix_unchanged() {
    let app = spawn_app().await;
    let id = create_draft(&app).await;
    for code in ["N1", "N2", "N3", "S1"] {
        expect_status(select(&app, &id, code).await, StatusCode::OK).await;
    }
    let body = auto_fill(&app, &id).await;
    assert_eq!(body["draft"]["activeZones"].as_array().map(Vec::len), Some(4));

    let paste = |text: &str| {
        json_request(
            "POST",
            &format!("/api/v1/drafts/{}/matrix/paste", id),
            json!({ "text": text }),
        )
    };

    let res = expect_status(
        send(&app, paste("1\t2\t3\n4\t5\t6\n7\t8\t9")).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    let error: Value = read_json(res).await;
    assert!(error["error"].as_str().is_some_and(|e| e.contains("4 zones")));

    let res = expect_status(
        send(&app, get(&format!("/api/v1/drafts/{}", id))).await,
        StatusCode::OK,
    )
    .await;
    let draft: Value = read_json(res).await;
    let untouched = draft["priceGrid"]["rows"]
        .as_array()
        .expect("rows should be an array")
        .iter()
        .flat_map(|row| row.as_array().cloned().unwrap_or_default())
        .all(|cell| cell.as_f64() == Some(0.0));
    assert!(untouched);

    let block = "10\t20\t30\t40\n11\t21\t31\t41\n12\t22\t32\t42\n13\t23\t33\t43";
    let res = expect_status(send(&app, paste(block)).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["changed"], 16);
    assert_eq!(body["draft"]["priceGrid"]["rows"][0][1].as_f64(), Some(20.0));
}

#[tokio::test]
async fn finalize_requires_confirmation_for_empty_zones() {
    let app = spawn_app().await;
    let id = create_draft(&app).await;
    expect_status(select(&app, &id, "N1").await, StatusCode::OK).await;
    auto_fill(&app, &id).await;
    expect_status(select(&app, &id, "X1").await, StatusCode::OK).await;

    let finalize = |body: Value| {
        json_request("POST", &format!("/api/v1/drafts/{}/finalize", id), body)
    };

    let res = expect_status(send(&app, finalize(json!({}))).await, StatusCode::CONFLICT).await;
    let error: Value = read_json(res).await;
    assert!(error["error"].as_str().is_some_and(|e| e.contains("X1")));

    let res = expect_status(
        send(&app, finalize(json!({ "confirmEmptyZones": true }))).await,
        StatusCode::OK,
    )
    .await;
    let output: Value = read_json(res).await;
    let zones = output["zones"].as_array().expect("zones should be an array");
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0]["zoneCode"], "N1");
    assert!(output["priceMatrix"]["N1"]["N1"].is_number());
    assert!(output["priceMatrix"].get("X1").is_none());
}

#[tokio::test]
async fn deleted_draft_is_gone() {
    let app = spawn_app().await;
    let id = create_draft(&app).await;

    let req = axum::http::Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/drafts/{}", id))
        .body(axum::body::Body::empty())
        .expect("failed to build request");
    expect_status(send(&app, req).await, StatusCode::NO_CONTENT).await;

    let res = send(&app, get(&format!("/api/v1/drafts/{}", id))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn zone_operations_wait_for_reference_data() {
    let app = spawn_loading_app();

    let res = send(&app, json_request("POST", "/api/v1/drafts", json!({}))).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let res = expect_status(send(&app, get("/health")).await, StatusCode::SERVICE_UNAVAILABLE).await;
    let health: Value = read_json(res).await;
    assert_eq!(health["status"], "starting");
    assert_eq!(health["referenceData"], "loading");
}

#[tokio::test]
async fn toggle_flips_zone_in_sequence() {
    let app = spawn_app().await;
    let id = create_draft(&app).await;
    let toggle = |zone: &str| {
        json_request(
            "POST",
            &format!("/api/v1/drafts/{}/zones/{}/toggle", id, zone),
            json!({}),
        )
    };

    let res = expect_status(send(&app, toggle("N1")).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["changed"], json!(true));
    assert_eq!(body["draft"]["selected"], json!(["N1"]));

    expect_status(send(&app, toggle("N2")).await, StatusCode::OK).await;
    expect_status(send(&app, toggle("N1")).await, StatusCode::CONFLICT).await;

    let res = expect_status(send(&app, toggle("N2")).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["changed"], json!(false));
    assert_eq!(body["draft"]["selected"], json!(["N1"]));
}

#[tokio::test]
async fn drafts_are_listed_per_vendor() {
    let app = spawn_app().await;
    let first = create_draft(&app).await;
    let second = create_draft(&app).await;
    expect_status(
        send(&app, json_request("POST", "/api/v1/drafts", json!({ "vendorId": "globex" }))).await,
        StatusCode::CREATED,
    )
    .await;

    let res = expect_status(send(&app, get("/api/v1/drafts?vendorId=acme")).await, StatusCode::OK).await;
    let drafts: Vec<Value> = read_json(res).await;
    let ids: Vec<&str> = drafts.iter().filter_map(|d| d["id"].as_str()).collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);

    let res = send(&app, get("/api/v1/drafts?vendorId=%20")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
