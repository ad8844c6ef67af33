use super::lookup::{SelectionWarning, ZoneInfo, ZoneLookup};
use super::schema::{BlueprintDocument, BlueprintSchema, LegacyZone};
use crate::domain::shared::names::place_key;
use crate::domain::zone::{
    catalog::ZoneCatalog,
    value_objects::{Region, ZoneCode, ZoneKind},
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;
use tracing::{debug, info};

/// Border cities that legitimately price in either of two zones. Resolution
/// prefers the first listed zone that exists in the loaded blueprint.
const BORDER_CITIES: &[(&str, &str, &[&str])] = &[("PANCHKULA", "HARYANA", &["N1", "N2"])];

#[derive(Debug, Error, PartialEq)]
pub enum BlueprintError {
    #[error("Blueprint contains no zones")]
    Empty,
    #[error("Blueprint zone code '{0}' is not a valid zone code")]
    InvalidZoneCode(String),
    #[error("Blueprint zone {zone} has unknown region '{region}'")]
    UnknownRegion { zone: String, region: String },
}

#[derive(Debug, Clone, Default)]
struct StateZones {
    zones: Vec<ZoneCode>,
    capital_zones: Vec<ZoneCode>,
}

/// Blueprint-backed implementation of [`ZoneLookup`].
///
/// Built once from either blueprint layout; immutable afterwards.
#[derive(Debug, Clone)]
pub struct BlueprintResolver {
    catalog: ZoneCatalog,
    zones: BTreeMap<ZoneCode, ZoneInfo>,
    states: HashMap<String, StateZones>,
}

/// Zone data accumulated while reading either layout.
struct ZoneDraft {
    region: Region,
    entries: Vec<(String, Vec<String>)>,
}

impl BlueprintResolver {
    pub fn from_schema(schema: BlueprintSchema) -> Result<Self, BlueprintError> {
        match schema {
            BlueprintSchema::Blueprint(doc) => Self::from_document(doc),
            BlueprintSchema::Legacy(zones) => Self::from_legacy(zones),
        }
    }

    fn from_document(doc: BlueprintDocument) -> Result<Self, BlueprintError> {
        let mut drafts = BTreeMap::new();
        for (raw_code, zone) in doc.zones {
            let code = parse_code(&raw_code)?;
            let region = parse_region(&raw_code, &zone.region)?;
            let entries = zone
                .raw_entries
                .into_iter()
                .map(|entry| (entry.state, entry.cities))
                .collect();
            drafts.insert(code, ZoneDraft { region, entries });
        }

        let mut state_index = HashMap::new();
        for (state, entry) in doc.state_index {
            let zones = entry
                .zones
                .iter()
                .map(|c| parse_code(c))
                .collect::<Result<Vec<_>, _>>()?;
            let capital_zones = entry
                .capital_zones
                .iter()
                .map(|c| parse_code(c))
                .collect::<Result<Vec<_>, _>>()?;
            state_index.insert(
                place_key(&state),
                StateZones {
                    zones,
                    capital_zones,
                },
            );
        }

        let mut groups: BTreeMap<Region, Vec<ZoneCode>> = BTreeMap::new();
        for (region_name, codes) in doc.regions {
            let region = parse_region(&region_name, &region_name)?;
            for raw in codes {
                groups.entry(region).or_default().push(parse_code(&raw)?);
            }
        }

        Self::assemble(drafts, state_index, groups)
    }

    fn from_legacy(zones: Vec<LegacyZone>) -> Result<Self, BlueprintError> {
        let mut drafts = BTreeMap::new();
        for zone in zones {
            let code = parse_code(&zone.code)?;
            let region = parse_region(&zone.code, &zone.region)?;
            let limited: HashMap<String, Vec<String>> = zone
                .cities
                .into_iter()
                .map(|(state, cities)| (place_key(&state), cities))
                .collect();
            let mut entries: Vec<(String, Vec<String>)> = zone
                .states
                .into_iter()
                .map(|state| {
                    let cities = limited.get(&place_key(&state)).cloned().unwrap_or_default();
                    (state, cities)
                })
                .collect();
            for (state, cities) in &limited {
                if !entries.iter().any(|(s, _)| place_key(s) == *state) {
                    entries.push((state.clone(), cities.clone()));
                }
            }
            drafts.insert(code, ZoneDraft { region, entries });
        }
        Self::assemble(drafts, HashMap::new(), BTreeMap::new())
    }

    /// Shared tail of both layouts: derive the state index where the input
    /// did not provide one, classify zones and build the catalog.
    fn assemble(
        drafts: BTreeMap<ZoneCode, ZoneDraft>,
        mut states: HashMap<String, StateZones>,
        mut groups: BTreeMap<Region, Vec<ZoneCode>>,
    ) -> Result<Self, BlueprintError> {
        if drafts.is_empty() {
            return Err(BlueprintError::Empty);
        }

        let derive_index = states.is_empty();
        let mut zones = BTreeMap::new();
        for (code, draft) in drafts {
            let mut zone_states: Vec<String> = Vec::new();
            let mut limited_cities: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for (raw_state, raw_cities) in draft.entries {
                let state = place_key(&raw_state);
                if !zone_states.contains(&state) {
                    zone_states.push(state.clone());
                }
                if !raw_cities.is_empty() {
                    let cities = limited_cities.entry(state.clone()).or_default();
                    for city in raw_cities {
                        let key = place_key(&city);
                        if !cities.contains(&key) {
                            cities.push(key);
                        }
                    }
                }
                if derive_index {
                    let entry = states.entry(state.clone()).or_default();
                    if !entry.zones.contains(&code) {
                        entry.zones.push(code.clone());
                    }
                    if limited_cities.contains_key(&state) && !entry.capital_zones.contains(&code) {
                        entry.capital_zones.push(code.clone());
                    }
                }
            }

            if derive_index || !groups.values().any(|codes| codes.contains(&code)) {
                groups.entry(draft.region).or_default().push(code.clone());
            }

            zones.insert(
                code.clone(),
                ZoneInfo {
                    code,
                    region: draft.region,
                    kind: ZoneKind::Full,
                    states: zone_states,
                    limited_cities,
                },
            );
        }

        let capital_codes: BTreeSet<ZoneCode> = states
            .values()
            .flat_map(|entry| entry.capital_zones.iter().cloned())
            .collect();
        for info in zones.values_mut() {
            info.kind = if info.region == Region::Special || info.code.prefix() == "X" {
                ZoneKind::Special
            } else if capital_codes.contains(&info.code) {
                ZoneKind::Limited
            } else {
                ZoneKind::Full
            };
        }

        let catalog = ZoneCatalog::from_regions(groups);
        info!(
            zones = zones.len(),
            states = states.len(),
            catalog = catalog.len(),
            "Zone blueprint resolved"
        );

        Ok(Self {
            catalog,
            zones,
            states,
        })
    }

    /// Zones in a state's index, preferred (primary) zone first.
    pub fn zones_of_state(&self, state: &str) -> Vec<ZoneCode> {
        self.states
            .get(&place_key(state))
            .map(|entry| entry.zones.clone())
            .unwrap_or_default()
    }

    pub fn zones(&self) -> impl Iterator<Item = &ZoneInfo> {
        self.zones.values()
    }

    fn border_zones(&self, city: &str, state: &str) -> Option<Vec<ZoneCode>> {
        BORDER_CITIES
            .iter()
            .find(|(c, s, _)| *c == city && *s == state)
            .map(|(_, _, codes)| {
                codes
                    .iter()
                    .filter_map(|c| ZoneCode::parse(c))
                    .filter(|code| self.zones.contains_key(code))
                    .collect::<Vec<_>>()
            })
            .filter(|codes| !codes.is_empty())
    }
}

impl ZoneLookup for BlueprintResolver {
    fn catalog(&self) -> &ZoneCatalog {
        &self.catalog
    }

    fn zone_info(&self, code: &ZoneCode) -> Option<&ZoneInfo> {
        self.zones.get(code)
    }

    /// Resolution order: border special cases, then a capital zone naming
    /// the city, then the state's first non-capital zone, then the state's
    /// primary zone.
    fn zones_for_city_state(&self, city: &str, state: &str) -> Vec<ZoneCode> {
        let city = place_key(city);
        let state = place_key(state);

        if let Some(codes) = self.border_zones(&city, &state) {
            debug!(city = %city, state = %state, "Border city resolved to multiple zones");
            return codes;
        }

        let Some(entry) = self.states.get(&state) else {
            return Vec::new();
        };

        let capital = entry.capital_zones.iter().find(|code| {
            self.zones
                .get(*code)
                .and_then(|info| info.limited_cities.get(&state))
                .is_some_and(|cities| cities.contains(&city))
        });
        if let Some(code) = capital {
            return vec![code.clone()];
        }

        entry
            .zones
            .iter()
            .find(|code| !entry.capital_zones.contains(code))
            .or_else(|| entry.zones.first())
            .map(|code| vec![code.clone()])
            .unwrap_or_default()
    }

    fn region_of_state(&self, state: &str) -> Option<Region> {
        let state = place_key(state);
        self.states
            .get(&state)
            .and_then(|entry| entry.zones.first())
            .and_then(|code| self.zones.get(code))
            .map(|info| info.region)
            .or_else(|| {
                self.zones
                    .values()
                    .find(|info| info.kind != ZoneKind::Special && info.states.contains(&state))
                    .map(|info| info.region)
            })
    }

    fn validate_selection(&self, zones: &[ZoneCode]) -> Vec<SelectionWarning> {
        let mut limited: BTreeMap<&str, Vec<ZoneCode>> = BTreeMap::new();
        let mut full: BTreeMap<&str, Vec<ZoneCode>> = BTreeMap::new();
        for code in zones {
            let Some(info) = self.zones.get(code) else {
                continue;
            };
            match info.kind {
                ZoneKind::Limited => {
                    for state in info.limited_cities.keys() {
                        limited.entry(state.as_str()).or_default().push(code.clone());
                    }
                }
                ZoneKind::Full => {
                    for state in &info.states {
                        full.entry(state.as_str()).or_default().push(code.clone());
                    }
                }
                ZoneKind::Special => {}
            }
        }

        limited
            .into_iter()
            .filter_map(|(state, limited_zones)| {
                let full_zones = full.get(state)?.clone();
                let message = format!(
                    "{} is split between limited zone(s) {} and full zone(s) {}; its capital cities are only eligible for the limited zone",
                    state,
                    join_codes(&limited_zones),
                    join_codes(&full_zones)
                );
                Some(SelectionWarning {
                    state: state.to_string(),
                    limited_zones,
                    full_zones,
                    message,
                })
            })
            .collect()
    }
}

fn parse_code(raw: &str) -> Result<ZoneCode, BlueprintError> {
    ZoneCode::parse(raw).ok_or_else(|| BlueprintError::InvalidZoneCode(raw.to_string()))
}

fn parse_region(zone: &str, raw: &str) -> Result<Region, BlueprintError> {
    raw.parse().map_err(|_| BlueprintError::UnknownRegion {
        zone: zone.to_string(),
        region: raw.to_string(),
    })
}

fn join_codes(codes: &[ZoneCode]) -> String {
    codes
        .iter()
        .map(ZoneCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blueprint::schema::{BlueprintZone, RawEntry, StateIndexEntry};

    fn code(raw: &str) -> ZoneCode {
        ZoneCode::parse(raw).unwrap()
    }

    fn entry(state: &str, cities: &[&str]) -> RawEntry {
        RawEntry {
            state: state.to_string(),
            cities: cities.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn zone(region: &str, entries: Vec<RawEntry>) -> BlueprintZone {
        BlueprintZone {
            region: region.to_string(),
            raw_entries: entries,
        }
    }

    fn north_blueprint() -> BlueprintResolver {
        let mut doc = BlueprintDocument::default();
        doc.regions
            .insert("North".into(), vec!["N1".into(), "N2".into()]);
        doc.regions.insert("Special".into(), vec!["X1".into()]);
        doc.zones
            .insert("N1".into(), zone("North", vec![entry("Delhi", &["New Delhi", "Delhi"])]));
        doc.zones.insert(
            "N2".into(),
            zone("North", vec![entry("Delhi", &[]), entry("Haryana", &[])]),
        );
        doc.zones.insert(
            "X1".into(),
            zone("Special", vec![entry("Andaman & Nicobar Islands", &[])]),
        );
        doc.state_index.insert(
            "DELHI".into(),
            StateIndexEntry {
                zones: vec!["N1".into(), "N2".into()],
                capital_zones: vec!["N1".into()],
            },
        );
        doc.state_index.insert(
            "HARYANA".into(),
            StateIndexEntry {
                zones: vec!["N2".into()],
                capital_zones: vec![],
            },
        );
        doc.state_index.insert(
            "ANDAMAN AND NICOBAR ISLANDS".into(),
            StateIndexEntry {
                zones: vec!["X1".into()],
                capital_zones: vec![],
            },
        );
        BlueprintResolver::from_schema(BlueprintSchema::Blueprint(doc)).unwrap()
    }

    #[test]
    fn classifies_limited_full_and_special_zones() {
        let resolver = north_blueprint();
        assert_eq!(resolver.zone_kind(&code("N1")), ZoneKind::Limited);
        assert_eq!(resolver.zone_kind(&code("N2")), ZoneKind::Full);
        assert_eq!(resolver.zone_kind(&code("X1")), ZoneKind::Special);

        let n1 = resolver.zone_info(&code("N1")).unwrap();
        assert_eq!(n1.limited_cities["DELHI"], vec!["NEW DELHI", "DELHI"]);
        let x1 = resolver.zone_info(&code("X1")).unwrap();
        assert_eq!(x1.designated_state(), Some("ANDAMAN AND NICOBAR ISLANDS"));
    }

    #[test]
    fn capital_cities_resolve_to_limited_zone_others_to_full_zone() {
        let resolver = north_blueprint();
        assert_eq!(resolver.zone_for_city_state("new delhi", "Delhi"), Some(code("N1")));
        assert_eq!(resolver.zone_for_city_state("Dwarka", "NCT of Delhi"), Some(code("N2")));
        assert_eq!(resolver.zone_for_city_state("Gurgaon", "Haryana"), Some(code("N2")));
        assert_eq!(resolver.zone_for_city_state("Pune", "Maharashtra"), None);
    }

    #[test]
    fn border_city_is_eligible_for_both_zones() {
        let resolver = north_blueprint();
        assert_eq!(
            resolver.zones_for_city_state("Panchkula", "Haryana"),
            vec![code("N1"), code("N2")]
        );
    }

    #[test]
    fn state_region_comes_from_primary_zone() {
        let resolver = north_blueprint();
        assert_eq!(resolver.region_of_state("haryana"), Some(Region::North));
        assert_eq!(resolver.region_of_state("Kerala"), None);
    }

    #[test]
    fn warns_when_state_split_between_limited_and_full() {
        let resolver = north_blueprint();
        let warnings = resolver.validate_selection(&[code("N1"), code("N2")]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].state, "DELHI");
        assert_eq!(warnings[0].limited_zones, vec![code("N1")]);
        assert_eq!(warnings[0].full_zones, vec![code("N2")]);

        assert!(resolver.validate_selection(&[code("N2")]).is_empty());
    }

    #[test]
    fn catalog_follows_blueprint_regions() {
        let resolver = north_blueprint();
        let catalog = resolver.catalog();
        assert_eq!(catalog.zones_of(Region::North), &[code("N1"), code("N2")]);
        assert_eq!(catalog.region_of(&code("X1")), Some(Region::Special));
    }

    #[test]
    fn legacy_layout_derives_state_index() {
        let zones = vec![
            LegacyZone {
                code: "S1".into(),
                region: "South".into(),
                states: vec!["Karnataka".into()],
                cities: [("Karnataka".to_string(), vec!["Bangalore".to_string()])]
                    .into_iter()
                    .collect(),
            },
            LegacyZone {
                code: "S2".into(),
                region: "South".into(),
                states: vec!["Karnataka".into(), "Kerala".into()],
                cities: BTreeMap::new(),
            },
        ];
        let resolver = BlueprintResolver::from_schema(BlueprintSchema::Legacy(zones)).unwrap();
        assert_eq!(resolver.zone_kind(&code("S1")), ZoneKind::Limited);
        assert_eq!(resolver.zone_for_city_state("Bengaluru", "Karnataka"), Some(code("S1")));
        assert_eq!(resolver.zone_for_city_state("Mysuru", "Karnataka"), Some(code("S2")));
        assert_eq!(resolver.zone_for_city_state("Kochi", "Kerala"), Some(code("S2")));
        assert_eq!(resolver.zones_of_state("Karnataka"), vec![code("S1"), code("S2")]);
    }

    #[test]
    fn rejects_invalid_codes_and_regions() {
        let mut doc = BlueprintDocument::default();
        doc.zones.insert("Q9".into(), zone("North", vec![]));
        assert_eq!(
            BlueprintResolver::from_schema(BlueprintSchema::Blueprint(doc)).unwrap_err(),
            BlueprintError::InvalidZoneCode("Q9".into())
        );

        let mut doc = BlueprintDocument::default();
        doc.zones.insert("N1".into(), zone("Atlantis", vec![]));
        assert!(matches!(
            BlueprintResolver::from_schema(BlueprintSchema::Blueprint(doc)),
            Err(BlueprintError::UnknownRegion { .. })
        ));

        assert_eq!(
            BlueprintResolver::from_schema(BlueprintSchema::Legacy(vec![])).unwrap_err(),
            BlueprintError::Empty
        );
    }
}
