use crate::domain::reference::index::IndexStats;
use crate::infrastructure::reference_data::store::ReferenceStatus;
use crate::presentation::http::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    reference_data: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_stats: Option<IndexStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_error: Option<String>,
    version: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let reference = state.reference.status().await;

    let (status, code) = match &reference {
        ReferenceStatus::Ready(_) => ("healthy", StatusCode::OK),
        ReferenceStatus::Loading => ("starting", StatusCode::SERVICE_UNAVAILABLE),
        ReferenceStatus::Failed(reason) => {
            tracing::error!("Health check failed: reference data unavailable: {}", reason);
            ("unhealthy", StatusCode::SERVICE_UNAVAILABLE)
        }
    };

    let response = HealthResponse {
        status,
        reference_data: reference.label(),
        reference_stats: match &reference {
            ReferenceStatus::Ready(data) => Some(data.index.stats()),
            _ => None,
        },
        reference_error: match reference {
            ReferenceStatus::Failed(reason) => Some(reason),
            _ => None,
        },
        version: env!("CARGO_PKG_VERSION"),
    };

    (code, Json(response))
}
