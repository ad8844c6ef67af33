use super::{blueprint::parse_zone, reference::parse_region};
use crate::{
    application::drafts::dto::{
        CitiesRequest, CompleteZoneRequest, CreateDraftRequest, DraftView, FinalizeRequest,
        PasteRequest, PriceCellRequest, StateRequest,
    },
    domain::{
        assignment::auto_fill::AutoFillReport,
        blueprint::lookup::SelectionWarning,
        zone::{
            entity::{CityKey, ZoneConfigurationOutput},
            value_objects::{Region, ZoneCode},
        },
    },
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A draft after a mutation, plus what the mutation changed.
#[derive(Serialize)]
pub struct DraftChange<T: Serialize> {
    pub draft: DraftView,
    pub changed: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftsQuery {
    pub vendor_id: String,
}

fn validated<T: Validate>(request: &T) -> Result<(), AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))
}

fn region_param(raw: &str) -> Result<Region, AppError> {
    parse_region(Some(raw))?.ok_or_else(|| AppError::BadRequest("Region is required".into()))
}

fn city_keys(request: &CitiesRequest) -> Result<Vec<CityKey>, AppError> {
    validated(request)?;
    request.city_keys().map_err(AppError::ValidationError)
}

pub async fn create_draft(
    State(state): State<AppState>,
    Json(request): Json<CreateDraftRequest>,
) -> Result<(StatusCode, Json<DraftView>), AppError> {
    let reference = state.reference_data().await?;
    let draft = state.drafts.create(request, &reference).await?;
    Ok((StatusCode::CREATED, Json(DraftView::from(&draft))))
}

pub async fn list_drafts(
    State(state): State<AppState>,
    Query(query): Query<DraftsQuery>,
) -> Result<Json<Vec<DraftView>>, AppError> {
    let drafts = state.drafts.list_for_vendor(&query.vendor_id).await?;
    Ok(Json(drafts.iter().map(DraftView::from).collect()))
}

pub async fn get_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftView>, AppError> {
    let draft = state.drafts.get(id).await?;
    Ok(Json(DraftView::from(&draft)))
}

pub async fn delete_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.drafts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn select_zone(
    State(state): State<AppState>,
    Path((id, code)): Path<(Uuid, String)>,
) -> Result<Json<DraftView>, AppError> {
    let code = parse_zone(&code)?;
    let reference = state.reference_data().await?;
    let draft = state.drafts.select_zone(id, &code, &reference).await?;
    Ok(Json(DraftView::from(&draft)))
}

pub async fn deselect_zone(
    State(state): State<AppState>,
    Path((id, code)): Path<(Uuid, String)>,
) -> Result<Json<DraftView>, AppError> {
    let code = parse_zone(&code)?;
    let draft = state.drafts.deselect_zone(id, &code).await?;
    Ok(Json(DraftView::from(&draft)))
}

pub async fn toggle_zone(
    State(state): State<AppState>,
    Path((id, code)): Path<(Uuid, String)>,
) -> Result<Json<DraftChange<bool>>, AppError> {
    let code = parse_zone(&code)?;
    let reference = state.reference_data().await?;
    let (draft, changed) = state.drafts.toggle_zone(id, &code, &reference).await?;
    Ok(Json(DraftChange {
        draft: DraftView::from(&draft),
        changed,
    }))
}

pub async fn select_region(
    State(state): State<AppState>,
    Path((id, region)): Path<(Uuid, String)>,
) -> Result<Json<DraftChange<Vec<ZoneCode>>>, AppError> {
    let region = region_param(&region)?;
    let reference = state.reference_data().await?;
    let (draft, changed) = state.drafts.select_region(id, region, &reference).await?;
    Ok(Json(DraftChange {
        draft: DraftView::from(&draft),
        changed,
    }))
}

pub async fn deselect_region(
    State(state): State<AppState>,
    Path((id, region)): Path<(Uuid, String)>,
) -> Result<Json<DraftChange<Vec<ZoneCode>>>, AppError> {
    let region = region_param(&region)?;
    let (draft, changed) = state.drafts.deselect_region(id, region).await?;
    Ok(Json(DraftChange {
        draft: DraftView::from(&draft),
        changed,
    }))
}

pub async fn select_all(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftChange<Vec<ZoneCode>>>, AppError> {
    let reference = state.reference_data().await?;
    let (draft, changed) = state.drafts.select_all(id, &reference).await?;
    Ok(Json(DraftChange {
        draft: DraftView::from(&draft),
        changed,
    }))
}

pub async fn deselect_all(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftChange<Vec<ZoneCode>>>, AppError> {
    let (draft, changed) = state.drafts.deselect_all(id).await?;
    Ok(Json(DraftChange {
        draft: DraftView::from(&draft),
        changed,
    }))
}

pub async fn available_cities(
    State(state): State<AppState>,
    Path((id, code)): Path<(Uuid, String)>,
) -> Result<Json<Vec<CityKey>>, AppError> {
    let code = parse_zone(&code)?;
    let reference = state.reference_data().await?;
    Ok(Json(state.drafts.available_cities(id, &code, &reference).await?))
}

pub async fn assign_cities(
    State(state): State<AppState>,
    Path((id, code)): Path<(Uuid, String)>,
    Json(request): Json<CitiesRequest>,
) -> Result<Json<DraftChange<usize>>, AppError> {
    let code = parse_zone(&code)?;
    let cities = city_keys(&request)?;
    let reference = state.reference_data().await?;
    let (draft, changed) = state
        .drafts
        .assign_cities(id, &code, &cities, &reference)
        .await?;
    Ok(Json(DraftChange {
        draft: DraftView::from(&draft),
        changed,
    }))
}

pub async fn unassign_cities(
    State(state): State<AppState>,
    Path((id, code)): Path<(Uuid, String)>,
    Json(request): Json<CitiesRequest>,
) -> Result<Json<DraftChange<usize>>, AppError> {
    let code = parse_zone(&code)?;
    let cities = city_keys(&request)?;
    let (draft, changed) = state.drafts.unassign_cities(id, &code, &cities).await?;
    Ok(Json(DraftChange {
        draft: DraftView::from(&draft),
        changed,
    }))
}

pub async fn assign_state(
    State(state): State<AppState>,
    Path((id, code)): Path<(Uuid, String)>,
    Json(request): Json<StateRequest>,
) -> Result<Json<DraftChange<Vec<CityKey>>>, AppError> {
    let code = parse_zone(&code)?;
    validated(&request)?;
    let reference = state.reference_data().await?;
    let (draft, changed) = state
        .drafts
        .assign_state(id, &code, &request.state, &reference)
        .await?;
    Ok(Json(DraftChange {
        draft: DraftView::from(&draft),
        changed,
    }))
}

pub async fn unassign_state(
    State(state): State<AppState>,
    Path((id, code)): Path<(Uuid, String)>,
    Json(request): Json<StateRequest>,
) -> Result<Json<DraftChange<Vec<CityKey>>>, AppError> {
    let code = parse_zone(&code)?;
    validated(&request)?;
    let (draft, changed) = state.drafts.unassign_state(id, &code, &request.state).await?;
    Ok(Json(DraftChange {
        draft: DraftView::from(&draft),
        changed,
    }))
}

pub async fn complete_zone(
    State(state): State<AppState>,
    Path((id, code)): Path<(Uuid, String)>,
    Json(request): Json<CompleteZoneRequest>,
) -> Result<Json<DraftView>, AppError> {
    let code = parse_zone(&code)?;
    let draft = state.drafts.complete_zone(id, &code, request.complete).await?;
    Ok(Json(DraftView::from(&draft)))
}

pub async fn auto_fill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftChange<AutoFillReport>>, AppError> {
    let reference = state.reference_data().await?;
    let (draft, changed) = state.drafts.auto_fill(id, &reference).await?;
    Ok(Json(DraftChange {
        draft: DraftView::from(&draft),
        changed,
    }))
}

pub async fn selection_warnings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SelectionWarning>>, AppError> {
    let reference = state.reference_data().await?;
    Ok(Json(state.drafts.warnings(id, &reference).await?))
}

pub async fn set_price(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PriceCellRequest>,
) -> Result<Json<DraftView>, AppError> {
    let from = parse_zone(&request.from)?;
    let to = parse_zone(&request.to)?;
    let draft = state.drafts.set_price(id, &from, &to, request.price).await?;
    Ok(Json(DraftView::from(&draft)))
}

pub async fn paste_prices(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PasteRequest>,
) -> Result<Json<DraftChange<usize>>, AppError> {
    let (draft, changed) = state.drafts.paste_prices(id, &request.text).await?;
    Ok(Json(DraftChange {
        draft: DraftView::from(&draft),
        changed,
    }))
}

pub async fn finalize(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<FinalizeRequest>,
) -> Result<Json<ZoneConfigurationOutput>, AppError> {
    Ok(Json(
        state.drafts.finalize(id, request.confirm_empty_zones).await?,
    ))
}
