use super::value_objects::{Region, ZoneCode};
use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

/// The fixed, ordered set of zone codes an operator can pick from.
///
/// Regions are kept in display order and each region's codes in ascending
/// sub-zone order; that order is what the sequential selection rules and the
/// auto-fill algorithm walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneCatalog {
    regions: Vec<(Region, Vec<ZoneCode>)>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogRegion {
    pub region: Region,
    pub sequential: bool,
    pub zones: Vec<ZoneCode>,
}

impl ZoneCatalog {
    /// The 19-code catalog used when a blueprint does not declare regions.
    pub fn standard() -> Self {
        let table: [(Region, &[&str]); 7] = [
            (Region::North, &["N1", "N2", "N3", "N4"]),
            (Region::South, &["S1", "S2", "S3", "S4"]),
            (Region::East, &["E1", "E2"]),
            (Region::West, &["W1", "W2", "W3"]),
            (Region::Central, &["C1", "C2"]),
            (Region::NorthEast, &["NE1", "NE2"]),
            (Region::Special, &["X1", "X2"]),
        ];
        let regions = table
            .iter()
            .map(|(region, codes)| {
                (
                    *region,
                    codes.iter().filter_map(|c| ZoneCode::parse(c)).collect(),
                )
            })
            .collect();
        Self { regions }
    }

    /// Builds a catalog from arbitrary region groupings, normalizing region
    /// and code order. Empty regions are dropped.
    pub fn from_regions(groups: BTreeMap<Region, Vec<ZoneCode>>) -> Self {
        let regions = groups
            .into_iter()
            .filter(|(_, codes)| !codes.is_empty())
            .map(|(region, mut codes)| {
                codes.sort();
                codes.dedup();
                (region, codes)
            })
            .collect();
        Self { regions }
    }

    pub fn regions(&self) -> impl Iterator<Item = Region> + '_ {
        self.regions.iter().map(|(region, _)| *region)
    }

    pub fn zones_of(&self, region: Region) -> &[ZoneCode] {
        self.regions
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, codes)| codes.as_slice())
            .unwrap_or(&[])
    }

    pub fn region_of(&self, code: &ZoneCode) -> Option<Region> {
        self.regions
            .iter()
            .find(|(_, codes)| codes.contains(code))
            .map(|(region, _)| *region)
    }

    pub fn contains(&self, code: &ZoneCode) -> bool {
        self.region_of(code).is_some()
    }

    /// Index of `code` within its region's ordered list.
    pub fn position(&self, code: &ZoneCode) -> Option<usize> {
        self.regions
            .iter()
            .find_map(|(_, codes)| codes.iter().position(|c| c == code))
    }

    /// Every code in display order.
    pub fn all_codes(&self) -> Vec<ZoneCode> {
        self.regions
            .iter()
            .flat_map(|(_, codes)| codes.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.regions.iter().map(|(_, codes)| codes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn describe(&self) -> Vec<CatalogRegion> {
        self.regions
            .iter()
            .map(|(region, codes)| CatalogRegion {
                region: *region,
                sequential: region.is_sequential(),
                zones: codes.clone(),
            })
            .collect()
    }
}

impl Default for ZoneCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
