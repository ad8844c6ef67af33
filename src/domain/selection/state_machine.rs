use crate::domain::zone::{
    catalog::ZoneCatalog,
    value_objects::{Region, ZoneCode},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum SelectionError {
    #[error("Zone {zone} is not in the zone catalog")]
    UnknownZone { zone: String },

    #[error("Zone {zone} is already selected")]
    AlreadySelected { zone: String },

    #[error("Zone {zone} is not selected")]
    NotSelected { zone: String },

    #[error("Zone {zone} cannot be selected yet; select {expected} first")]
    OutOfSequence { zone: String, expected: String },

    #[error("Zone {zone} cannot be deselected; deselect {last} first")]
    NotLastInRegion { zone: String, last: String },
}

/// Which catalog zones an operator has picked.
///
/// In every sequential region the selected codes always form a prefix of the
/// region's catalog order: a zone can only be selected when it is the next
/// one in line, and only the last selected zone of a region can be dropped.
/// Rejected operations leave the selection untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSelection {
    catalog: ZoneCatalog,
    selected: BTreeSet<ZoneCode>,
}

impl ZoneSelection {
    pub fn new(catalog: ZoneCatalog) -> Self {
        Self {
            catalog,
            selected: BTreeSet::new(),
        }
    }

    pub fn catalog(&self) -> &ZoneCatalog {
        &self.catalog
    }

    pub fn is_selected(&self, code: &ZoneCode) -> bool {
        self.selected.contains(code)
    }

    /// Selected codes, catalog codes in display order first, then any
    /// restored codes the catalog does not know.
    pub fn selected(&self) -> Vec<ZoneCode> {
        let mut ordered: Vec<ZoneCode> = self
            .catalog
            .all_codes()
            .into_iter()
            .filter(|code| self.selected.contains(code))
            .collect();
        ordered.extend(
            self.selected
                .iter()
                .filter(|code| !self.catalog.contains(code))
                .cloned(),
        );
        ordered
    }

    pub fn selected_in(&self, region: Region) -> Vec<ZoneCode> {
        self.catalog
            .zones_of(region)
            .iter()
            .filter(|code| self.selected.contains(*code))
            .cloned()
            .collect()
    }

    /// The only zone of `region` that may be selected next. For the
    /// exempt region this is simply the first unselected zone.
    pub fn next_selectable(&self, region: Region) -> Option<ZoneCode> {
        self.catalog
            .zones_of(region)
            .iter()
            .find(|code| !self.selected.contains(*code))
            .cloned()
    }

    pub fn select(&mut self, code: &ZoneCode) -> Result<(), SelectionError> {
        let region = self.region_of(code)?;
        if self.selected.contains(code) {
            return Err(SelectionError::AlreadySelected {
                zone: code.to_string(),
            });
        }
        if region.is_sequential() {
            if let Some(expected) = self.next_selectable(region).filter(|next| next != code) {
                warn!(zone = %code, expected = %expected, "Out-of-sequence zone selection rejected");
                return Err(SelectionError::OutOfSequence {
                    zone: code.to_string(),
                    expected: expected.to_string(),
                });
            }
        }
        self.selected.insert(code.clone());
        debug!(zone = %code, "Zone selected");
        Ok(())
    }

    /// Drops one zone. Restored codes outside the catalog have no region
    /// order and can always be dropped.
    pub fn deselect(&mut self, code: &ZoneCode) -> Result<(), SelectionError> {
        if !self.selected.contains(code) {
            self.region_of(code)?;
            return Err(SelectionError::NotSelected {
                zone: code.to_string(),
            });
        }
        let region = self.catalog.region_of(code);
        if let Some(region) = region.filter(|r| r.is_sequential()) {
            if let Some(last) = self.selected_in(region).pop().filter(|last| last != code) {
                warn!(zone = %code, last = %last, "Out-of-sequence zone deselection rejected");
                return Err(SelectionError::NotLastInRegion {
                    zone: code.to_string(),
                    last: last.to_string(),
                });
            }
        }
        self.selected.remove(code);
        debug!(zone = %code, "Zone deselected");
        Ok(())
    }

    /// Flips one zone, subject to the same ordering rules. Returns whether
    /// the zone is selected afterwards.
    pub fn toggle(&mut self, code: &ZoneCode) -> Result<bool, SelectionError> {
        if self.is_selected(code) {
            self.deselect(code).map(|_| false)
        } else {
            self.select(code).map(|_| true)
        }
    }

    /// Selects every zone of `region`; returns the newly selected codes.
    pub fn select_region(&mut self, region: Region) -> Vec<ZoneCode> {
        let added: Vec<ZoneCode> = self
            .catalog
            .zones_of(region)
            .iter()
            .filter(|code| !self.selected.contains(*code))
            .cloned()
            .collect();
        self.selected.extend(added.iter().cloned());
        added
    }

    /// Deselects every zone of `region`; returns the removed codes.
    pub fn deselect_region(&mut self, region: Region) -> Vec<ZoneCode> {
        let removed = self.selected_in(region);
        for code in &removed {
            self.selected.remove(code);
        }
        removed
    }

    pub fn select_all(&mut self) -> Vec<ZoneCode> {
        let regions: Vec<Region> = self.catalog.regions().collect();
        regions
            .into_iter()
            .flat_map(|region| self.select_region(region))
            .collect()
    }

    pub fn deselect_all(&mut self) -> Vec<ZoneCode> {
        let removed = self.selected();
        self.selected.clear();
        removed
    }

    /// Replaces the selection wholesale, e.g. from an uploaded file.
    ///
    /// Ordering rules are not enforced here: uploaded zone sets are whatever
    /// the vendor uses. Gaps and codes outside the catalog are logged.
    pub fn restore(&mut self, codes: impl IntoIterator<Item = ZoneCode>) {
        self.selected = codes.into_iter().collect();

        let unknown: Vec<&str> = self
            .selected
            .iter()
            .filter(|code| !self.catalog.contains(code))
            .map(ZoneCode::as_str)
            .collect();
        if !unknown.is_empty() {
            warn!(zones = ?unknown, "Restored zones outside the catalog");
        }
        for region in self.catalog.regions().filter(|r| r.is_sequential()) {
            if !self.is_prefix(region) {
                warn!(region = %region, "Restored selection is not a prefix of the region order");
            }
        }
    }

    /// Whether the selected codes of `region` form a prefix of its order.
    pub fn is_prefix(&self, region: Region) -> bool {
        let zones = self.catalog.zones_of(region);
        let count = self.selected_in(region).len();
        zones[..count].iter().all(|code| self.selected.contains(code))
    }

    fn region_of(&self, code: &ZoneCode) -> Result<Region, SelectionError> {
        self.catalog
            .region_of(code)
            .ok_or_else(|| SelectionError::UnknownZone {
                zone: code.to_string(),
            })
    }
}
