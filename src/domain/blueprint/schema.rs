//! Serialized forms of the zone blueprint.
//!
//! Two layouts exist in the wild: the current blueprint document (regions,
//! per-zone raw entries and a per-state index of capital zones) and an older
//! flat list of zones. Both deserialize into [`BlueprintSchema`] once at load
//! time; nothing downstream looks at the raw layout again.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlueprintSchema {
    Blueprint(BlueprintDocument),
    Legacy(Vec<LegacyZone>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintDocument {
    /// Region name → ordered zone codes.
    #[serde(default)]
    pub regions: BTreeMap<String, Vec<String>>,
    pub zones: BTreeMap<String, BlueprintZone>,
    /// State name → zones touching it and which of those are capital zones.
    #[serde(default)]
    pub state_index: BTreeMap<String, StateIndexEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintZone {
    pub region: String,
    #[serde(default)]
    pub raw_entries: Vec<RawEntry>,
}

/// One `(state, cities)` pair. Empty `cities` means the entire state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEntry {
    pub state: String,
    #[serde(default)]
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateIndexEntry {
    #[serde(default)]
    pub zones: Vec<String>,
    #[serde(default)]
    pub capital_zones: Vec<String>,
}

/// Flat zone description used by older reference files. Any state listed in
/// `cities` is limited to those cities; the zone is then a capital zone for
/// that state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyZone {
    pub code: String,
    pub region: String,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub cities: BTreeMap<String, Vec<String>>,
}
