use super::value_objects::{Region, ZoneCode};
use crate::domain::pricing::matrix::PriceMatrixMap;
use crate::domain::shared::names::place_key;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

const CITY_KEY_SEPARATOR: &str = "||";

/// Composite identity of a city: `"<CITY>||<STATE>"`, both parts normalized.
///
/// City names repeat across states (there is an Aurangabad in Bihar and one
/// in Maharashtra), so the state is always part of the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct CityKey(String);

impl CityKey {
    pub fn new(city: &str, state: &str) -> Self {
        Self(format!(
            "{}{}{}",
            place_key(city),
            CITY_KEY_SEPARATOR,
            place_key(state)
        ))
    }

    /// Parses and re-normalizes a `"CITY||STATE"` string.
    pub fn parse(raw: &str) -> Option<Self> {
        let (city, state) = raw.split_once(CITY_KEY_SEPARATOR)?;
        if city.trim().is_empty() || state.trim().is_empty() {
            return None;
        }
        Some(Self::new(city, state))
    }

    pub fn city(&self) -> &str {
        self.0
            .split_once(CITY_KEY_SEPARATOR)
            .map(|(city, _)| city)
            .unwrap_or(&self.0)
    }

    pub fn state(&self) -> &str {
        self.0
            .split_once(CITY_KEY_SEPARATOR)
            .map(|(_, state)| state)
            .unwrap_or("")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The cities and states a vendor has placed in one pricing zone.
///
/// # Lifecycle
/// 1. Created empty when the zone is selected
/// 2. Filled by manual city assignment or auto-fill
/// 3. Marked complete when the operator confirms it
/// 4. Destroyed when the zone is deselected
///
/// # Invariants
/// - `selected_states` is exactly the set of states of `selected_cities`
/// - a `CityKey` appears in at most one zone of a configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ZoneConfig {
    pub zone_code: ZoneCode,
    pub region: Option<Region>,
    pub selected_states: Vec<String>,
    pub selected_cities: Vec<CityKey>,
    pub is_complete: bool,
}

impl ZoneConfig {
    pub fn new(zone_code: ZoneCode, region: Option<Region>) -> Self {
        Self {
            zone_code,
            region,
            selected_states: Vec::new(),
            selected_cities: Vec::new(),
            is_complete: false,
        }
    }

    /// A zone is active, and priced, once it holds at least one city.
    pub fn is_active(&self) -> bool {
        !self.selected_cities.is_empty()
    }

    pub fn contains_city(&self, key: &CityKey) -> bool {
        self.selected_cities.contains(key)
    }

    /// Recomputes `selected_states` from `selected_cities`, keeping both
    /// lists sorted.
    pub fn refresh_states(&mut self) {
        self.selected_cities.sort();
        let mut states: Vec<String> = self
            .selected_cities
            .iter()
            .map(|key| key.state().to_string())
            .collect();
        states.sort();
        states.dedup();
        self.selected_states = states;
    }
}

/// The normalized hand-off shape shared by the upload path and the
/// interactive selection path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ZoneConfigurationOutput {
    pub zones: Vec<ZoneConfig>,
    pub price_matrix: PriceMatrixMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub oda_pincodes: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_key_normalizes_both_parts() {
        let key = CityKey::new(" new  delhi ", "nct of delhi");
        assert_eq!(key.as_str(), "NEW DELHI||DELHI");
        assert_eq!(key.city(), "NEW DELHI");
        assert_eq!(key.state(), "DELHI");
    }

    #[test]
    fn city_key_parse_round_trips_and_rejects_garbage() {
        let key = CityKey::parse("pune||maharashtra").unwrap();
        assert_eq!(key, CityKey::new("Pune", "Maharashtra"));
        assert!(CityKey::parse("pune").is_none());
        assert!(CityKey::parse("||maharashtra").is_none());
    }

    #[test]
    fn refresh_states_tracks_cities() {
        let mut zone = ZoneConfig::new(ZoneCode::parse("W1").unwrap(), Some(Region::West));
        assert!(!zone.is_active());
        zone.selected_cities.push(CityKey::new("Pune", "Maharashtra"));
        zone.selected_cities.push(CityKey::new("Mumbai", "Maharashtra"));
        zone.selected_cities.push(CityKey::new("Surat", "Gujarat"));
        zone.refresh_states();
        assert_eq!(zone.selected_states, vec!["GUJARAT", "MAHARASHTRA"]);
        assert!(zone.is_active());
    }
}
