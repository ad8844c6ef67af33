use super::dto::{IssueKind, ParseIssue, ParsedPincodeEntry, ZoneSummary};
use crate::domain::blueprint::lookup::ZoneLookup;
use crate::domain::pricing::matrix::PriceMatrix;
use crate::domain::zone::{
    entity::{CityKey, ZoneConfig, ZoneConfigurationOutput},
    value_objects::ZoneCode,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Per-zone counts, ordered by zone code (direction prefix, then number).
pub fn summarize(entries: &[ParsedPincodeEntry], lookup: &dyn ZoneLookup) -> Vec<ZoneSummary> {
    #[derive(Default)]
    struct Tally<'a> {
        pincodes: usize,
        cities: BTreeSet<(&'a str, &'a str)>,
        states: BTreeSet<&'a str>,
    }

    let mut tallies: BTreeMap<&ZoneCode, Tally> = BTreeMap::new();
    for entry in entries {
        let tally = tallies.entry(&entry.zone).or_default();
        tally.pincodes += 1;
        if let Some(state) = entry.state.as_deref() {
            tally.states.insert(state);
            if let Some(city) = entry.city.as_deref() {
                tally.cities.insert((city, state));
            }
        }
    }

    tallies
        .into_iter()
        .map(|(zone, tally)| ZoneSummary {
            zone_code: zone.clone(),
            region: lookup.region_of_zone(zone),
            pincode_count: tally.pincodes,
            city_count: tally.cities.len(),
            state_count: tally.states.len(),
        })
        .collect()
}

/// Folds entries into the shared output shape.
///
/// Each city goes to the zone holding most of its pincodes so that no city
/// ends up in two zones; ties go to the earlier zone in zone order and every
/// split city is reported as a `CITY_CONFLICT` warning. The price matrix is
/// zero-filled over the zones that received cities.
pub fn fold_entries(
    entries: &[ParsedPincodeEntry],
    lookup: &dyn ZoneLookup,
) -> (ZoneConfigurationOutput, Vec<ParseIssue>) {
    let mut zones: BTreeMap<ZoneCode, ZoneConfig> = BTreeMap::new();
    let mut votes: BTreeMap<CityKey, BTreeMap<ZoneCode, usize>> = BTreeMap::new();
    let mut oda: BTreeSet<String> = BTreeSet::new();

    for entry in entries {
        zones
            .entry(entry.zone.clone())
            .or_insert_with(|| ZoneConfig::new(entry.zone.clone(), lookup.region_of_zone(&entry.zone)));
        if let (Some(city), Some(state)) = (entry.city.as_deref(), entry.state.as_deref()) {
            *votes
                .entry(CityKey::new(city, state))
                .or_default()
                .entry(entry.zone.clone())
                .or_default() += 1;
        }
        if entry.is_oda {
            oda.insert(entry.pincode.clone());
        }
    }

    let mut warnings = Vec::new();
    for (city, tally) in votes {
        let Some((winner, _)) = tally
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        else {
            continue;
        };
        let winner = winner.clone();
        if tally.len() > 1 {
            let split = tally
                .iter()
                .map(|(zone, count)| format!("{} ({})", zone, count))
                .collect::<Vec<_>>()
                .join(", ");
            warnings.push(ParseIssue {
                row: None,
                kind: IssueKind::CityConflict,
                message: format!(
                    "City {} has pincodes in zones {}; assigned to {}",
                    city, split, winner
                ),
                value: Some(city.to_string()),
            });
        }
        if let Some(zone) = zones.get_mut(&winner) {
            zone.selected_cities.push(city);
        }
    }

    for zone in zones.values_mut() {
        zone.refresh_states();
    }
    let active: Vec<ZoneCode> = zones
        .values()
        .filter(|zone| zone.is_active())
        .map(|zone| zone.zone_code.clone())
        .collect();
    debug!(
        zones = zones.len(),
        active = active.len(),
        conflicts = warnings.len(),
        "Entries folded into zone configs"
    );

    let output = ZoneConfigurationOutput {
        zones: zones.into_values().collect(),
        price_matrix: PriceMatrix::new(&active).to_map(),
        oda_pincodes: (!oda.is_empty()).then(|| oda.into_iter().collect()),
    };
    (output, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::zone::catalog::ZoneCatalog;
    use crate::domain::zone::value_objects::{Region, ZoneKind};
    use crate::domain::blueprint::lookup::{SelectionWarning, ZoneInfo};

    /// Lookup with no blueprint zones; regions come from code prefixes.
    struct PrefixLookup(ZoneCatalog);

    impl ZoneLookup for PrefixLookup {
        fn catalog(&self) -> &ZoneCatalog {
            &self.0
        }
        fn zone_info(&self, _code: &ZoneCode) -> Option<&ZoneInfo> {
            None
        }
        fn zones_for_city_state(&self, _city: &str, _state: &str) -> Vec<ZoneCode> {
            Vec::new()
        }
        fn region_of_state(&self, _state: &str) -> Option<Region> {
            None
        }
        fn validate_selection(&self, _zones: &[ZoneCode]) -> Vec<SelectionWarning> {
            Vec::new()
        }
    }

    fn entry(pincode: &str, zone: &str, city: Option<&str>, is_oda: bool) -> ParsedPincodeEntry {
        ParsedPincodeEntry {
            pincode: pincode.to_string(),
            zone: ZoneCode::parse(zone).unwrap(),
            is_oda,
            state: city.map(|_| "DELHI".to_string()),
            city: city.map(str::to_string),
            source_row: 0,
        }
    }

    #[test]
    fn summary_counts_and_orders_by_zone() {
        let lookup = PrefixLookup(ZoneCatalog::standard());
        let entries = vec![
            entry("400001", "W1", None, false),
            entry("110001", "N1", Some("NEW DELHI"), false),
            entry("110002", "N1", Some("NEW DELHI"), false),
            entry("110075", "N1", Some("DWARKA"), false),
        ];
        let summary = summarize(&entries, &lookup);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].zone_code.as_str(), "N1");
        assert_eq!(summary[0].pincode_count, 3);
        assert_eq!(summary[0].city_count, 2);
        assert_eq!(summary[0].state_count, 1);
        assert_eq!(summary[0].region, Some(Region::North));
        assert_eq!(summary[1].zone_code.as_str(), "W1");
        assert_eq!(summary[1].city_count, 0);
        assert_eq!(lookup.zone_kind(&summary[1].zone_code), ZoneKind::Full);
    }

    #[test]
    fn split_city_goes_to_majority_zone() {
        let lookup = PrefixLookup(ZoneCatalog::standard());
        let entries = vec![
            entry("110001", "N2", Some("NEW DELHI"), false),
            entry("110002", "N1", Some("NEW DELHI"), true),
            entry("110003", "N2", Some("NEW DELHI"), false),
            entry("110075", "N1", Some("DWARKA"), false),
            entry("110076", "N2", Some("DWARKA"), false),
        ];
        let (output, warnings) = fold_entries(&entries, &lookup);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.kind == IssueKind::CityConflict));

        let n1 = &output.zones[0];
        let n2 = &output.zones[1];
        assert_eq!(n1.zone_code.as_str(), "N1");
        assert_eq!(n1.selected_cities, vec![CityKey::new("Dwarka", "Delhi")]);
        assert_eq!(n2.selected_cities, vec![CityKey::new("New Delhi", "Delhi")]);
        assert_eq!(output.oda_pincodes, Some(vec!["110002".to_string()]));
        assert_eq!(output.price_matrix.len(), 2);
    }

    #[test]
    fn zones_without_cities_stay_out_of_the_matrix() {
        let lookup = PrefixLookup(ZoneCatalog::standard());
        let entries = vec![
            entry("400001", "W1", None, false),
            entry("110001", "N1", Some("NEW DELHI"), false),
        ];
        let (output, warnings) = fold_entries(&entries, &lookup);
        assert!(warnings.is_empty());
        assert_eq!(output.zones.len(), 2);
        assert_eq!(output.price_matrix.keys().map(ZoneCode::as_str).collect::<Vec<_>>(), vec!["N1"]);
        assert_eq!(output.oda_pincodes, None);
    }
}
