use crate::{
    domain::{
        pincode::{entity::PincodeRecord, value_objects::normalize_pincode},
        zone::{entity::CityKey, value_objects::Region},
    },
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Deserialize)]
pub struct StatesQuery {
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CitiesQuery {
    pub state: String,
    pub region: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityEntry {
    pub key: CityKey,
    pub city: String,
    pub state: String,
    pub pincode_count: usize,
}

pub(crate) fn parse_region(raw: Option<&str>) -> Result<Option<Region>, AppError> {
    raw.map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| Region::from_str(r).map_err(AppError::BadRequest))
        .transpose()
}

pub async fn list_states(
    State(state): State<AppState>,
    Query(query): Query<StatesQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let region = parse_region(query.region.as_deref())?;
    let reference = state.reference_data().await?;
    Ok(Json(reference.index.states_of(region)))
}

pub async fn list_cities(
    State(state): State<AppState>,
    Query(query): Query<CitiesQuery>,
) -> Result<Json<Vec<CityEntry>>, AppError> {
    let region = parse_region(query.region.as_deref())?;
    let reference = state.reference_data().await?;
    if !reference.index.is_known_state(&query.state) {
        return Err(AppError::NotFound(format!("Unknown state '{}'", query.state)));
    }

    let cities = reference
        .index
        .cities_of(&query.state, region)
        .into_iter()
        .map(|key| CityEntry {
            city: key.city().to_string(),
            state: key.state().to_string(),
            pincode_count: reference.index.pincodes_of(&key).len(),
            key,
        })
        .collect();
    Ok(Json(cities))
}

pub async fn get_pincode(
    State(state): State<AppState>,
    Path(pincode): Path<String>,
) -> Result<Json<PincodeRecord>, AppError> {
    let normalized = normalize_pincode(&pincode)
        .ok_or_else(|| AppError::BadRequest(format!("'{}' is not a valid 6-digit pincode", pincode)))?;
    let reference = state.reference_data().await?;
    reference
        .index
        .record_of(&normalized)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Pincode {} is not in the reference data", normalized)))
}
