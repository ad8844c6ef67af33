use super::helpers::{expect_status, get, read_json, read_text, send, spawn_app, upload_request};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;

fn zone_summary<'a>(report: &'a Value, zone: &str) -> &'a Value {
    report["summary"]
        .as_array()
        .expect("summary should be an array")
        .iter()
        .find(|s| s["zoneCode"] == zone)
        .unwrap_or_else(|| panic!("zone {} missing from summary", zone))
}

#[tokio::test]
async fn upload_groups_pincodes_by_zone() {
    let app = spawn_app().await;
    let csv = "pincode,zone,isOda\n110001,N1,false\n110002,N1,false\n400001,W1,false";

    let res = expect_status(
        send(&app, upload_request("zones.csv", csv.as_bytes(), &[])).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    let report = &body["report"];

    assert_eq!(report["entries"].as_array().map(Vec::len), Some(3));
    assert_eq!(report["errorCount"], 0);
    assert_eq!(report["summary"].as_array().map(Vec::len), Some(2));
    assert_eq!(zone_summary(report, "N1")["pincodeCount"], 2);
    assert_eq!(zone_summary(report, "W1")["pincodeCount"], 1);
    assert_eq!(report["configuration"]["zones"].as_array().map(Vec::len), Some(2));
    assert!(body.get("draft").is_none());
}

#[tokio::test]
async fn workbook_upload_keeps_six_digit_pincodes() {
    let app = spawn_app().await;
    let workbook = include_bytes!("../fixtures/zones.xlsx");

    let res = expect_status(
        send(&app, upload_request("zones.xlsx", workbook, &[])).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    let report = &body["report"];

    assert_eq!(report["format"], "workbook");
    let pincodes: Vec<&str> = report["entries"]
        .as_array()
        .expect("entries should be an array")
        .iter()
        .filter_map(|e| e["pincode"].as_str())
        .collect();
    assert_eq!(pincodes, vec!["110001", "110002", "400001"]);
    assert_eq!(zone_summary(report, "N1")["pincodeCount"], 2);
}

#[tokio::test]
async fn upload_detects_columns_from_header_keywords() {
    let app = spawn_app().await;
    let csv = "Pin Code,Region\n560001,S1\n";

    let res = expect_status(
        send(&app, upload_request("vendor.csv", csv.as_bytes(), &[])).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    let report = &body["report"];

    assert_eq!(report["headerDetected"], true);
    assert_eq!(report["columns"]["pincode"], 0);
    assert_eq!(report["columns"]["zone"], 1);
    let detections = report["columns"]["detections"]
        .as_array()
        .expect("detections should be an array");
    for role in ["pincode", "zone"] {
        let detection = detections
            .iter()
            .find(|d| d["role"] == role)
            .unwrap_or_else(|| panic!("no detection for {}", role));
        assert_eq!(detection["confidence"].as_f64(), Some(0.95));
    }
}

#[tokio::test]
async fn upload_can_open_a_draft() {
    let app = spawn_app().await;
    let csv = "pincode,zone\n110001,N1\n560001,S1\n";

    let res = expect_status(
        send(
            &app,
            upload_request(
                "zones.csv",
                csv.as_bytes(),
                &[("vendor_id", "acme"), ("create_draft", "true")],
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    let draft = &body["draft"];

    assert_eq!(draft["source"], "upload");
    assert_eq!(draft["vendorId"], "acme");
    assert_eq!(draft["zones"].as_array().map(Vec::len), Some(2));

    let id = draft["id"].as_str().expect("draft id");
    let res = send(&app, get(&format!("/api/v1/drafts/{}", id))).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn upload_rejects_unsupported_format() {
    let app = spawn_app().await;
    let res = send(&app, upload_request("zones.pdf", b"%PDF-1.4", &[])).await;
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn upload_without_zone_column_reports_what_was_found() {
    let app = spawn_app().await;
    let csv = "pincode,notes\n110001,hello\n400001,world\n";

    let res = expect_status(
        send(&app, upload_request("zones.csv", csv.as_bytes(), &[])).await,
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await;
    let body: Value = read_json(res).await;

    assert_eq!(body["kind"], "MISSING_DATA");
    assert!(body["error"].as_str().is_some_and(|e| e.contains("zone")));
    assert_eq!(body["details"]["headers"][0], "pincode");
}

#[tokio::test]
async fn upload_requires_file_field() {
    let app = spawn_app().await;
    let boundary = "----zone-boundary-empty";
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/zones/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(format!("--{}--\r\n", boundary)))
        .expect("failed to build request");

    let res = send(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn template_download_is_csv_attachment() {
    let app = spawn_app().await;
    let res = expect_status(send(&app, get("/api/v1/zones/template")).await, StatusCode::OK).await;

    let disposition = res
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("zone_template.csv"));

    let body = read_text(res).await;
    assert!(body.starts_with("pincode,zone,isOda"));
}

#[tokio::test]
async fn uploaded_template_ingests_cleanly() {
    let app = spawn_app().await;
    let template = read_text(send(&app, get("/api/v1/zones/template")).await).await;

    let res = expect_status(
        send(&app, upload_request("zone_template.csv", template.as_bytes(), &[])).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["report"]["errorCount"], 0);
    assert_eq!(body["report"]["configuration"]["odaPincodes"][0], "744101");
}
