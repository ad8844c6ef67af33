use crate::domain::zone::{
    catalog::ZoneCatalog,
    value_objects::{Region, ZoneCode, ZoneKind},
};
use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

/// Resolved description of one blueprint zone.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ZoneInfo {
    pub code: ZoneCode,
    pub region: Region,
    pub kind: ZoneKind,
    /// Normalized state keys the zone touches.
    pub states: Vec<String>,
    /// State key → normalized city keys, for states the zone only partly
    /// covers.
    pub limited_cities: BTreeMap<String, Vec<String>>,
}

impl ZoneInfo {
    /// The single state a special zone draws its cities from.
    pub fn designated_state(&self) -> Option<&str> {
        self.states.first().map(String::as_str)
    }

    /// Whether the zone covers `state` entirely rather than a named subset.
    pub fn covers_whole_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state) && !self.limited_cities.contains_key(state)
    }
}

/// A state split between a limited and a full zone in the same selection.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SelectionWarning {
    pub state: String,
    pub limited_zones: Vec<ZoneCode>,
    pub full_zones: Vec<ZoneCode>,
    pub message: String,
}

/// Read-only zone knowledge derived from the blueprint.
///
/// Every consumer (assignment engine, ingestion, HTTP handlers) goes through
/// this trait so none of them depends on which blueprint layout was loaded.
pub trait ZoneLookup: Send + Sync {
    fn catalog(&self) -> &ZoneCatalog;

    fn zone_info(&self, code: &ZoneCode) -> Option<&ZoneInfo>;

    /// Every zone a city may legitimately belong to, preferred zone first.
    fn zones_for_city_state(&self, city: &str, state: &str) -> Vec<ZoneCode>;

    fn region_of_state(&self, state: &str) -> Option<Region>;

    /// Warnings for states split across limited and full zones.
    fn validate_selection(&self, zones: &[ZoneCode]) -> Vec<SelectionWarning>;

    fn zone_for_city_state(&self, city: &str, state: &str) -> Option<ZoneCode> {
        self.zones_for_city_state(city, state).into_iter().next()
    }

    fn region_of_zone(&self, code: &ZoneCode) -> Option<Region> {
        self.zone_info(code)
            .map(|info| info.region)
            .or_else(|| self.catalog().region_of(code))
            .or_else(|| Region::from_zone_prefix(code))
    }

    fn zone_kind(&self, code: &ZoneCode) -> ZoneKind {
        match self.zone_info(code) {
            Some(info) => info.kind,
            None if self.region_of_zone(code) == Some(Region::Special) => ZoneKind::Special,
            None => ZoneKind::Full,
        }
    }
}
