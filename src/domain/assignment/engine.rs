use crate::domain::blueprint::lookup::{ZoneInfo, ZoneLookup};
use crate::domain::reference::index::ReferenceIndex;
use crate::domain::shared::names::place_key;
use crate::domain::zone::{
    entity::{CityKey, ZoneConfig},
    value_objects::{Region, ZoneCode, ZoneKind},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum AssignmentError {
    #[error("Zone {zone} is not selected")]
    ZoneNotSelected { zone: String },

    #[error("City {city} is not part of zone {zone}'s territory")]
    CityUnavailable { city: String, zone: String },

    #[error("City {city} is already assigned to zone {owner}")]
    CityAlreadyClaimed { city: String, owner: String },

    #[error("City {city} is not assigned to zone {zone}")]
    CityNotInZone { city: String, zone: String },

    #[error("State {state} has no cities available to zone {zone}")]
    StateUnavailable { state: String, zone: String },
}

/// City assignments for every selected zone of one configuration.
///
/// `owners` maps each claimed city to its zone and is updated on every
/// mutation, so a city can never be claimed twice and availability checks
/// never rescan all zones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityAssignments {
    zones: BTreeMap<ZoneCode, ZoneConfig>,
    owners: HashMap<CityKey, ZoneCode>,
}

impl CityAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty config for a newly selected zone. No-op if present.
    pub fn add_zone(&mut self, code: &ZoneCode, region: Option<Region>) {
        self.zones
            .entry(code.clone())
            .or_insert_with(|| ZoneConfig::new(code.clone(), region));
    }

    /// Drops a zone and releases all of its cities.
    pub fn remove_zone(&mut self, code: &ZoneCode) -> Option<ZoneConfig> {
        let removed = self.zones.remove(code)?;
        for city in &removed.selected_cities {
            self.owners.remove(city);
        }
        Some(removed)
    }

    /// Installs a pre-built config, e.g. one folded from an upload. Fails
    /// without changes if any of its cities is owned by another zone.
    pub fn restore_zone(&mut self, mut config: ZoneConfig) -> Result<(), AssignmentError> {
        let code = config.zone_code.clone();
        if let Some((city, owner)) = config
            .selected_cities
            .iter()
            .find_map(|city| self.owners.get(city).filter(|o| **o != code).map(|o| (city, o)))
        {
            return Err(AssignmentError::CityAlreadyClaimed {
                city: city.to_string(),
                owner: owner.to_string(),
            });
        }
        self.remove_zone(&code);
        config.selected_cities.sort();
        config.selected_cities.dedup();
        config.refresh_states();
        for city in &config.selected_cities {
            self.owners.insert(city.clone(), code.clone());
        }
        self.zones.insert(code, config);
        Ok(())
    }

    pub fn zone(&self, code: &ZoneCode) -> Option<&ZoneConfig> {
        self.zones.get(code)
    }

    pub fn zones(&self) -> impl Iterator<Item = &ZoneConfig> {
        self.zones.values()
    }

    pub fn zone_codes(&self) -> Vec<ZoneCode> {
        self.zones.keys().cloned().collect()
    }

    pub fn owner_of(&self, city: &CityKey) -> Option<&ZoneCode> {
        self.owners.get(city)
    }

    /// Zones holding at least one city.
    pub fn active_zones(&self) -> Vec<ZoneCode> {
        self.zones
            .values()
            .filter(|zone| zone.is_active())
            .map(|zone| zone.zone_code.clone())
            .collect()
    }

    pub fn empty_zones(&self) -> Vec<ZoneCode> {
        self.zones
            .values()
            .filter(|zone| !zone.is_active())
            .map(|zone| zone.zone_code.clone())
            .collect()
    }

    /// Cities the zone may hold that no other zone has claimed. Cities the
    /// zone already holds are included.
    pub fn available_cities(
        &self,
        code: &ZoneCode,
        lookup: &dyn ZoneLookup,
        index: &ReferenceIndex,
    ) -> Result<Vec<CityKey>, AssignmentError> {
        self.require(code)?;
        Ok(territory(code, lookup, index)
            .into_iter()
            .filter(|city| self.owners.get(city).is_none_or(|owner| owner == code))
            .collect())
    }

    /// Claims one city for a zone. Returns `false` if the zone already held it.
    pub fn assign_city(
        &mut self,
        code: &ZoneCode,
        city: &CityKey,
        lookup: &dyn ZoneLookup,
        index: &ReferenceIndex,
    ) -> Result<bool, AssignmentError> {
        self.require(code)?;
        match self.owners.get(city) {
            Some(owner) if owner == code => return Ok(false),
            Some(owner) => {
                warn!(city = %city, zone = %code, owner = %owner, "City already claimed");
                return Err(AssignmentError::CityAlreadyClaimed {
                    city: city.to_string(),
                    owner: owner.to_string(),
                });
            }
            None => {}
        }
        if !territory(code, lookup, index).contains(city) {
            return Err(AssignmentError::CityUnavailable {
                city: city.to_string(),
                zone: code.to_string(),
            });
        }
        self.claim(code, std::slice::from_ref(city));
        Ok(true)
    }

    pub fn unassign_city(&mut self, code: &ZoneCode, city: &CityKey) -> Result<(), AssignmentError> {
        let zone = self
            .zones
            .get_mut(code)
            .ok_or_else(|| AssignmentError::ZoneNotSelected {
                zone: code.to_string(),
            })?;
        if !zone.contains_city(city) {
            return Err(AssignmentError::CityNotInZone {
                city: city.to_string(),
                zone: code.to_string(),
            });
        }
        zone.selected_cities.retain(|c| c != city);
        zone.refresh_states();
        zone.is_complete = false;
        self.owners.remove(city);
        debug!(city = %city, zone = %code, "City unassigned");
        Ok(())
    }

    /// Claims every available city of `state` at once. Returns the cities
    /// newly added.
    pub fn assign_state(
        &mut self,
        code: &ZoneCode,
        state: &str,
        lookup: &dyn ZoneLookup,
        index: &ReferenceIndex,
    ) -> Result<Vec<CityKey>, AssignmentError> {
        let state_key = place_key(state);
        let candidates: Vec<CityKey> = self
            .available_cities(code, lookup, index)?
            .into_iter()
            .filter(|city| city.state() == state_key)
            .collect();
        if candidates.is_empty() {
            return Err(AssignmentError::StateUnavailable {
                state: state_key,
                zone: code.to_string(),
            });
        }
        let added: Vec<CityKey> = candidates
            .into_iter()
            .filter(|city| !self.owners.contains_key(city))
            .collect();
        self.claim(code, &added);
        Ok(added)
    }

    /// Releases every city of `state` held by the zone.
    pub fn unassign_state(
        &mut self,
        code: &ZoneCode,
        state: &str,
    ) -> Result<Vec<CityKey>, AssignmentError> {
        let state_key = place_key(state);
        let zone = self
            .zones
            .get_mut(code)
            .ok_or_else(|| AssignmentError::ZoneNotSelected {
                zone: code.to_string(),
            })?;
        let (removed, kept): (Vec<CityKey>, Vec<CityKey>) = zone
            .selected_cities
            .drain(..)
            .partition(|city| city.state() == state_key);
        zone.selected_cities = kept;
        zone.refresh_states();
        if !removed.is_empty() {
            zone.is_complete = false;
        }
        for city in &removed {
            self.owners.remove(city);
        }
        Ok(removed)
    }

    pub fn set_complete(&mut self, code: &ZoneCode, complete: bool) -> Result<(), AssignmentError> {
        let zone = self
            .zones
            .get_mut(code)
            .ok_or_else(|| AssignmentError::ZoneNotSelected {
                zone: code.to_string(),
            })?;
        zone.is_complete = complete;
        Ok(())
    }

    /// Releases the cities of every zone while keeping the zones.
    pub fn clear_cities(&mut self) {
        for zone in self.zones.values_mut() {
            zone.selected_cities.clear();
            zone.selected_states.clear();
            zone.is_complete = false;
        }
        self.owners.clear();
    }

    /// Whether `owners` mirrors the zone configs exactly.
    pub fn is_consistent(&self) -> bool {
        let claimed: usize = self.zones.values().map(|z| z.selected_cities.len()).sum();
        claimed == self.owners.len()
            && self.zones.values().all(|zone| {
                zone.selected_cities
                    .iter()
                    .all(|city| self.owners.get(city) == Some(&zone.zone_code))
            })
    }

    /// Adds unowned `cities` to the zone. Callers have checked eligibility.
    pub(crate) fn claim(&mut self, code: &ZoneCode, cities: &[CityKey]) {
        let Some(zone) = self.zones.get_mut(code) else {
            return;
        };
        let mut added = 0usize;
        for city in cities {
            if self.owners.contains_key(city) {
                continue;
            }
            self.owners.insert(city.clone(), code.clone());
            zone.selected_cities.push(city.clone());
            added += 1;
        }
        if added > 0 {
            zone.refresh_states();
            zone.is_complete = false;
            debug!(zone = %code, added, "Cities assigned");
        }
    }

    fn require(&self, code: &ZoneCode) -> Result<&ZoneConfig, AssignmentError> {
        self.zones
            .get(code)
            .ok_or_else(|| AssignmentError::ZoneNotSelected {
                zone: code.to_string(),
            })
    }
}

/// Every city a zone may hold, ignoring claims.
///
/// Limited zones cover only their named cities that exist in the reference
/// index; full zones cover every city of their states; special zones cover
/// every city of their designated state.
pub fn territory(code: &ZoneCode, lookup: &dyn ZoneLookup, index: &ReferenceIndex) -> Vec<CityKey> {
    let Some(info) = lookup.zone_info(code) else {
        return Vec::new();
    };
    match info.kind {
        ZoneKind::Limited => named_cities(info, index),
        ZoneKind::Full => info
            .states
            .iter()
            .flat_map(|state| index.cities_in_state(state))
            .collect(),
        ZoneKind::Special => info
            .designated_state()
            .map(|state| index.cities_in_state(state))
            .unwrap_or_default(),
    }
}

fn named_cities(info: &ZoneInfo, index: &ReferenceIndex) -> Vec<CityKey> {
    info.limited_cities
        .iter()
        .flat_map(|(state, cities)| cities.iter().map(move |city| CityKey::new(city, state)))
        .filter(|key| index.contains_city(key))
        .collect()
}
