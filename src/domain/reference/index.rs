use crate::domain::blueprint::lookup::ZoneLookup;
use crate::domain::pincode::{
    entity::{PincodeRecord, RawPincodeRow},
    value_objects::{is_valid_pincode, normalize_pincode},
};
use crate::domain::shared::names::{is_placeholder, place_key};
use crate::domain::zone::{entity::CityKey, value_objects::Region};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{info, warn};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct IndexStats {
    pub accepted: usize,
    /// Rows dropped for a placeholder state/city or an unusable pincode.
    pub filtered: usize,
    /// Rows repeating an already indexed pincode; the first row wins.
    pub duplicates: usize,
    pub states: usize,
    pub cities: usize,
}

/// Immutable lookup structure over the pincode reference table.
///
/// Keys are normalized with [`place_key`] on the way in and on every query,
/// so callers may pass display names.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    records: HashMap<String, PincodeRecord>,
    /// state → city → pincodes
    states: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
    regions: BTreeMap<Region, BTreeSet<String>>,
    state_regions: HashMap<String, Region>,
    stats: IndexStats,
}

impl ReferenceIndex {
    pub fn build<I>(rows: I, lookup: &dyn ZoneLookup) -> Self
    where
        I: IntoIterator<Item = RawPincodeRow>,
    {
        let mut index = Self::default();

        for row in rows {
            if is_placeholder(&row.state) || is_placeholder(&row.city) {
                index.stats.filtered += 1;
                continue;
            }
            let pincode = row.pincode.trim().to_string();
            if !is_valid_pincode(&pincode) {
                index.stats.filtered += 1;
                continue;
            }
            if index.records.contains_key(&pincode) {
                index.stats.duplicates += 1;
                continue;
            }

            let state = place_key(&row.state);
            let city = place_key(&row.city);
            index
                .states
                .entry(state.clone())
                .or_default()
                .entry(city.clone())
                .or_default()
                .insert(pincode.clone());

            let zone = row
                .zone
                .map(|z| z.trim().to_uppercase())
                .filter(|z| !z.is_empty() && !is_placeholder(z));
            index.records.insert(
                pincode.clone(),
                PincodeRecord {
                    pincode,
                    zone,
                    state,
                    city,
                },
            );
            index.stats.accepted += 1;
        }

        let mut unregioned = 0usize;
        for state in index.states.keys() {
            match lookup.region_of_state(state) {
                Some(region) => {
                    index.regions.entry(region).or_default().insert(state.clone());
                    index.state_regions.insert(state.clone(), region);
                }
                None => unregioned += 1,
            }
        }

        index.stats.states = index.states.len();
        index.stats.cities = index.states.values().map(BTreeMap::len).sum();

        if unregioned > 0 {
            warn!(
                states = unregioned,
                "Reference states not covered by the zone blueprint"
            );
        }
        info!(
            accepted = index.stats.accepted,
            filtered = index.stats.filtered,
            duplicates = index.stats.duplicates,
            states = index.stats.states,
            cities = index.stats.cities,
            "Pincode reference index built"
        );

        index
    }

    pub fn record_of(&self, pincode: &str) -> Option<&PincodeRecord> {
        normalize_pincode(pincode).and_then(|p| self.records.get(&p))
    }

    /// Cities of `state`, or nothing if `region` is given and the state does
    /// not belong to it.
    pub fn cities_of(&self, state: &str, region: Option<Region>) -> Vec<CityKey> {
        let state = place_key(state);
        if region.is_some_and(|region| self.state_regions.get(&state) != Some(&region)) {
            return Vec::new();
        }
        self.city_keys(&state)
    }

    /// Every city of `state` regardless of region.
    pub fn cities_in_state(&self, state: &str) -> Vec<CityKey> {
        self.city_keys(&place_key(state))
    }

    /// States in `region`, or every indexed state when `region` is `None`.
    pub fn states_of(&self, region: Option<Region>) -> Vec<String> {
        match region {
            Some(region) => self
                .regions
                .get(&region)
                .map(|states| states.iter().cloned().collect())
                .unwrap_or_default(),
            None => self.states.keys().cloned().collect(),
        }
    }

    pub fn pincodes_of(&self, city: &CityKey) -> Vec<String> {
        self.states
            .get(city.state())
            .and_then(|cities| cities.get(city.city()))
            .map(|pincodes| pincodes.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn contains_city(&self, city: &CityKey) -> bool {
        self.states
            .get(city.state())
            .is_some_and(|cities| cities.contains_key(city.city()))
    }

    pub fn region_of_state(&self, state: &str) -> Option<Region> {
        self.state_regions.get(&place_key(state)).copied()
    }

    pub fn known_states(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn is_known_state(&self, raw: &str) -> bool {
        self.states.contains_key(&place_key(raw))
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn city_keys(&self, state: &str) -> Vec<CityKey> {
        self.states
            .get(state)
            .map(|cities| cities.keys().map(|city| CityKey::new(city, state)).collect())
            .unwrap_or_default()
    }
}
