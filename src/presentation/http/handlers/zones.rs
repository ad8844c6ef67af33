use crate::{
    application::{
        drafts::dto::DraftView,
        ingestion::{
            dto::{IngestZoneFileRequest, IngestionReport},
            template::{TEMPLATE_CSV, TEMPLATE_FILE_NAME},
        },
    },
    domain::{blueprint::lookup::{ZoneInfo, ZoneLookup}, zone::catalog::CatalogRegion},
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;

const MAX_VENDOR_ID_LEN: usize = 64;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub regions: Vec<CatalogRegion>,
    pub zones: Vec<ZoneInfo>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub report: IngestionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<DraftView>,
}

pub async fn get_catalog(State(state): State<AppState>) -> Result<Json<CatalogResponse>, AppError> {
    let reference = state.reference_data().await?;
    Ok(Json(CatalogResponse {
        regions: reference.resolver.catalog().describe(),
        zones: reference.resolver.zones().cloned().collect(),
    }))
}

pub async fn download_template() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", TEMPLATE_FILE_NAME),
            ),
        ],
        TEMPLATE_CSV,
    )
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("The uploaded file exceeds the size limit".into())
    } else {
        AppError::BadRequest(format!("Malformed upload: {}", err.body_text()))
    }
}

/// Multipart fields: `file` (required), `vendor_id`, and `create_draft`
/// (`true` opens the result as an editable draft).
pub async fn upload_zone_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file = None;
    let mut vendor_id = None;
    let mut create_draft = false;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or("") {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some((file_name, data));
            }
            "vendor_id" => {
                let text = field.text().await.map_err(multipart_error)?;
                let text = text.trim();
                if text.len() > MAX_VENDOR_ID_LEN {
                    return Err(AppError::ValidationError(format!(
                        "vendor_id must be at most {} characters",
                        MAX_VENDOR_ID_LEN
                    )));
                }
                vendor_id = (!text.is_empty()).then(|| text.to_string());
            }
            "create_draft" => {
                let text = field.text().await.map_err(multipart_error)?;
                create_draft = matches!(text.trim(), "true" | "1" | "yes");
            }
            _ => {}
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;
    let reference = state.reference_data().await?;

    let request = IngestZoneFileRequest {
        file_name,
        data,
        vendor_id: vendor_id.clone(),
    };
    let report = state.ingestion.execute(&request, &reference).await?;

    let draft = if create_draft {
        let draft = state
            .drafts
            .create_from_upload(vendor_id, report.configuration.clone(), &reference)
            .await?;
        Some(DraftView::from(&draft))
    } else {
        None
    };

    Ok(Json(UploadResponse { report, draft }))
}
