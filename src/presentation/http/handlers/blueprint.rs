use crate::{
    domain::{
        blueprint::lookup::{ZoneInfo, ZoneLookup},
        zone::value_objects::{Region, ZoneCode},
    },
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub city: String,
    pub state: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    /// Primary zone for the city.
    pub zone: Option<ZoneCode>,
    /// Every candidate; more than one only for border cities.
    pub candidates: Vec<ZoneCode>,
    pub region: Option<Region>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateZonesResponse {
    pub state: String,
    pub region: Option<Region>,
    /// Primary zone first.
    pub zones: Vec<ZoneCode>,
}

pub(crate) fn parse_zone(raw: &str) -> Result<ZoneCode, AppError> {
    ZoneCode::parse(raw)
        .ok_or_else(|| AppError::BadRequest(format!("'{}' is not a valid zone code", raw)))
}

pub async fn get_zone_info(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ZoneInfo>, AppError> {
    let code = parse_zone(&code)?;
    let reference = state.reference_data().await?;
    reference
        .resolver
        .zone_info(&code)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Zone {} is not in the blueprint", code)))
}

pub async fn resolve_city(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolveResponse>, AppError> {
    if query.city.trim().is_empty() || query.state.trim().is_empty() {
        return Err(AppError::BadRequest("Both city and state are required".into()));
    }
    let reference = state.reference_data().await?;
    let lookup = reference.lookup();
    let candidates = lookup.zones_for_city_state(&query.city, &query.state);
    Ok(Json(ResolveResponse {
        zone: candidates.first().cloned(),
        region: lookup.region_of_state(&query.state),
        candidates,
    }))
}

pub async fn state_zones(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StateZonesResponse>, AppError> {
    let reference = state.reference_data().await?;
    let zones = reference.resolver.zones_of_state(&name);
    if zones.is_empty() {
        return Err(AppError::NotFound(format!("State '{}' has no zones in the blueprint", name)));
    }
    Ok(Json(StateZonesResponse {
        region: reference.lookup().region_of_state(&name),
        state: name,
        zones,
    }))
}
