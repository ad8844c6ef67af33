use super::engine::{CityAssignments, territory};
use crate::domain::blueprint::lookup::ZoneLookup;
use crate::domain::reference::index::ReferenceIndex;
use crate::domain::zone::value_objects::ZoneCode;
use serde::Serialize;
use tracing::{info, warn};
use ts_rs::TS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AutoFillReport {
    /// Zones holding at least one city after the run.
    pub filled: usize,
    pub empty: usize,
    pub empty_zones: Vec<ZoneCode>,
    /// Cities claimed by this run.
    pub claimed: usize,
}

/// Assigns cities to every selected zone that has none yet.
///
/// Zones are visited in catalog display order (region by region, ascending
/// sub-zone number), followed by any selected codes the catalog does not
/// list. A zone that already holds cities keeps them unchanged. Empty zones
/// fill from their territory minus whatever earlier zones claimed, so
/// limited zones take their named capital cities before the full zone of
/// the same state sweeps up the rest.
pub fn auto_fill(
    assignments: &mut CityAssignments,
    lookup: &dyn ZoneLookup,
    index: &ReferenceIndex,
) -> AutoFillReport {
    let selected = assignments.zone_codes();
    let mut order: Vec<ZoneCode> = lookup
        .catalog()
        .all_codes()
        .into_iter()
        .filter(|code| selected.contains(code))
        .collect();
    order.extend(
        selected
            .iter()
            .filter(|code| !lookup.catalog().contains(code))
            .cloned(),
    );

    let mut report = AutoFillReport::default();
    for code in &order {
        let already_filled = assignments.zone(code).is_some_and(|zone| zone.is_active());
        if !already_filled {
            let cities: Vec<_> = territory(code, lookup, index)
                .into_iter()
                .filter(|city| assignments.owner_of(city).is_none())
                .collect();
            report.claimed += cities.len();
            assignments.claim(code, &cities);
        }

        if assignments.zone(code).is_some_and(|zone| zone.is_active()) {
            report.filled += 1;
        } else {
            warn!(zone = %code, "Zone has no unclaimed cities after auto-fill");
            report.empty += 1;
            report.empty_zones.push(code.clone());
        }
    }

    info!(
        filled = report.filled,
        empty = report.empty,
        claimed = report.claimed,
        "Auto-fill finished"
    );
    report
}
