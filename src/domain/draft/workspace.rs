use crate::domain::assignment::{
    auto_fill::{AutoFillReport, auto_fill},
    engine::{AssignmentError, CityAssignments},
};
use crate::domain::blueprint::lookup::{SelectionWarning, ZoneLookup};
use crate::domain::pricing::matrix::{MatrixError, PriceGrid, PriceMatrix};
use crate::domain::reference::index::ReferenceIndex;
use crate::domain::selection::state_machine::{SelectionError, ZoneSelection};
use crate::domain::zone::{
    catalog::ZoneCatalog,
    entity::{CityKey, ZoneConfig, ZoneConfigurationOutput},
    value_objects::{Region, ZoneCode},
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error("{} zone(s) have no cities and will be left out of pricing: {}", .zones.len(), .zones.join(", "))]
    EmptyZones { zones: Vec<String> },
}

/// One vendor's zone configuration while it is being edited.
///
/// Ties the selection state machine, the city assignments and the price
/// matrix together: every mutation that can change the active zone set
/// re-keys the matrix before returning, so the matrix never references a
/// zone without cities.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneWorkspace {
    selection: ZoneSelection,
    assignments: CityAssignments,
    matrix: PriceMatrix,
    oda_pincodes: Option<Vec<String>>,
}

impl ZoneWorkspace {
    pub fn new(catalog: ZoneCatalog) -> Self {
        Self {
            selection: ZoneSelection::new(catalog),
            assignments: CityAssignments::new(),
            matrix: PriceMatrix::default(),
            oda_pincodes: None,
        }
    }

    /// Rebuilds a workspace from the shared output shape, as produced by the
    /// upload pipeline. Prices between zones that end up active are kept.
    pub fn from_output(
        output: ZoneConfigurationOutput,
        lookup: &dyn ZoneLookup,
    ) -> Result<Self, WorkspaceError> {
        let mut workspace = Self::new(lookup.catalog().clone());
        workspace
            .selection
            .restore(output.zones.iter().map(|zone| zone.zone_code.clone()));
        for mut zone in output.zones {
            if zone.region.is_none() {
                zone.region = lookup.region_of_zone(&zone.zone_code);
            }
            workspace.assignments.restore_zone(zone)?;
        }
        let active = workspace.active_zones();
        workspace.matrix = PriceMatrix::from_map(&active, &output.price_matrix);
        workspace.oda_pincodes = output.oda_pincodes;
        Ok(workspace)
    }

    pub fn selected(&self) -> Vec<ZoneCode> {
        self.selection.selected()
    }

    pub fn catalog(&self) -> &ZoneCatalog {
        self.selection.catalog()
    }

    pub fn next_selectable(&self, region: Region) -> Option<ZoneCode> {
        self.selection.next_selectable(region)
    }

    /// Every selected zone's config, in display order.
    pub fn zones(&self) -> Vec<&ZoneConfig> {
        self.selection
            .selected()
            .iter()
            .filter_map(|code| self.assignments.zone(code))
            .collect()
    }

    pub fn zone(&self, code: &ZoneCode) -> Option<&ZoneConfig> {
        self.assignments.zone(code)
    }

    /// Selected zones holding at least one city, in display order.
    pub fn active_zones(&self) -> Vec<ZoneCode> {
        self.selection
            .selected()
            .into_iter()
            .filter(|code| self.assignments.zone(code).is_some_and(ZoneConfig::is_active))
            .collect()
    }

    pub fn empty_zones(&self) -> Vec<ZoneCode> {
        self.selection
            .selected()
            .into_iter()
            .filter(|code| !self.assignments.zone(code).is_some_and(ZoneConfig::is_active))
            .collect()
    }

    pub fn oda_pincodes(&self) -> Option<&[String]> {
        self.oda_pincodes.as_deref()
    }

    pub fn grid(&self) -> PriceGrid {
        self.matrix.grid()
    }

    pub fn matrix(&self) -> &PriceMatrix {
        &self.matrix
    }

    pub fn select_zone(&mut self, code: &ZoneCode, lookup: &dyn ZoneLookup) -> Result<(), WorkspaceError> {
        self.selection.select(code)?;
        self.assignments.add_zone(code, lookup.region_of_zone(code));
        Ok(())
    }

    pub fn deselect_zone(&mut self, code: &ZoneCode) -> Result<(), WorkspaceError> {
        self.selection.deselect(code)?;
        self.assignments.remove_zone(code);
        self.sync_matrix();
        Ok(())
    }

    /// Selects or drops one zone depending on its current state. Returns
    /// whether it is selected afterwards.
    pub fn toggle_zone(&mut self, code: &ZoneCode, lookup: &dyn ZoneLookup) -> Result<bool, WorkspaceError> {
        let selected = self.selection.toggle(code)?;
        if selected {
            self.assignments.add_zone(code, lookup.region_of_zone(code));
        } else {
            self.assignments.remove_zone(code);
            self.sync_matrix();
        }
        Ok(selected)
    }

    pub fn select_region(&mut self, region: Region, lookup: &dyn ZoneLookup) -> Vec<ZoneCode> {
        let added = self.selection.select_region(region);
        for code in &added {
            self.assignments.add_zone(code, lookup.region_of_zone(code));
        }
        added
    }

    pub fn deselect_region(&mut self, region: Region) -> Vec<ZoneCode> {
        let removed = self.selection.deselect_region(region);
        for code in &removed {
            self.assignments.remove_zone(code);
        }
        self.sync_matrix();
        removed
    }

    pub fn select_all(&mut self, lookup: &dyn ZoneLookup) -> Vec<ZoneCode> {
        let added = self.selection.select_all();
        for code in &added {
            self.assignments.add_zone(code, lookup.region_of_zone(code));
        }
        added
    }

    /// Deselects everything and releases every assigned city.
    pub fn deselect_all(&mut self) -> Vec<ZoneCode> {
        let removed = self.selection.deselect_all();
        self.assignments.clear_cities();
        for code in &removed {
            self.assignments.remove_zone(code);
        }
        self.sync_matrix();
        removed
    }

    pub fn available_cities(
        &self,
        code: &ZoneCode,
        lookup: &dyn ZoneLookup,
        index: &ReferenceIndex,
    ) -> Result<Vec<CityKey>, WorkspaceError> {
        Ok(self.assignments.available_cities(code, lookup, index)?)
    }

    /// Assigns all `cities` or none of them. Returns how many were new.
    pub fn assign_cities(
        &mut self,
        code: &ZoneCode,
        cities: &[CityKey],
        lookup: &dyn ZoneLookup,
        index: &ReferenceIndex,
    ) -> Result<usize, WorkspaceError> {
        let mut staged = self.assignments.clone();
        let mut added = 0;
        for city in cities {
            if staged.assign_city(code, city, lookup, index)? {
                added += 1;
            }
        }
        self.assignments = staged;
        self.sync_matrix();
        Ok(added)
    }

    /// Unassigns all `cities` or none of them.
    pub fn unassign_cities(&mut self, code: &ZoneCode, cities: &[CityKey]) -> Result<usize, WorkspaceError> {
        let mut staged = self.assignments.clone();
        for city in cities {
            staged.unassign_city(code, city)?;
        }
        self.assignments = staged;
        self.sync_matrix();
        Ok(cities.len())
    }

    pub fn assign_state(
        &mut self,
        code: &ZoneCode,
        state: &str,
        lookup: &dyn ZoneLookup,
        index: &ReferenceIndex,
    ) -> Result<Vec<CityKey>, WorkspaceError> {
        let added = self.assignments.assign_state(code, state, lookup, index)?;
        self.sync_matrix();
        Ok(added)
    }

    pub fn unassign_state(&mut self, code: &ZoneCode, state: &str) -> Result<Vec<CityKey>, WorkspaceError> {
        let removed = self.assignments.unassign_state(code, state)?;
        self.sync_matrix();
        Ok(removed)
    }

    pub fn complete_zone(&mut self, code: &ZoneCode, complete: bool) -> Result<(), WorkspaceError> {
        self.assignments.set_complete(code, complete)?;
        Ok(())
    }

    pub fn auto_fill(&mut self, lookup: &dyn ZoneLookup, index: &ReferenceIndex) -> AutoFillReport {
        let report = auto_fill(&mut self.assignments, lookup, index);
        self.sync_matrix();
        report
    }

    pub fn warnings(&self, lookup: &dyn ZoneLookup) -> Vec<SelectionWarning> {
        lookup.validate_selection(&self.selection.selected())
    }

    pub fn set_price(&mut self, from: &ZoneCode, to: &ZoneCode, price: f64) -> Result<(), WorkspaceError> {
        self.matrix.set_price(from, to, price)?;
        Ok(())
    }

    pub fn paste_prices(&mut self, text: &str) -> Result<usize, WorkspaceError> {
        let written = self.matrix.apply_paste(text)?;
        debug!(cells = written, "Price block pasted");
        Ok(written)
    }

    /// The current state in the shared output shape, empty zones included.
    pub fn snapshot(&self) -> ZoneConfigurationOutput {
        ZoneConfigurationOutput {
            zones: self.zones().into_iter().cloned().collect(),
            price_matrix: self.matrix.to_map(),
            oda_pincodes: self.oda_pincodes.clone(),
        }
    }

    /// Produces the final configuration. Empty zones are refused unless the
    /// operator confirmed them; confirmed empty zones are left out of the
    /// output, which therefore only lists priced zones.
    pub fn finalize(&self, confirm_empty: bool) -> Result<ZoneConfigurationOutput, WorkspaceError> {
        let empty = self.empty_zones();
        if !empty.is_empty() {
            if !confirm_empty {
                return Err(WorkspaceError::EmptyZones {
                    zones: empty.iter().map(ZoneCode::to_string).collect(),
                });
            }
            warn!(zones = ?empty, "Finalizing with empty zones left out of pricing");
        }

        let zones: Vec<ZoneConfig> = self
            .zones()
            .into_iter()
            .filter(|zone| zone.is_active())
            .cloned()
            .collect();
        info!(zones = zones.len(), "Zone configuration finalized");
        Ok(ZoneConfigurationOutput {
            zones,
            price_matrix: self.matrix.to_map(),
            oda_pincodes: self.oda_pincodes.clone(),
        })
    }

    fn sync_matrix(&mut self) {
        let active = self.active_zones();
        if self.matrix.sync_zones(&active) {
            debug!(zones = active.len(), "Price matrix re-keyed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{code, index, resolver};

    fn workspace() -> ZoneWorkspace {
        ZoneWorkspace::new(resolver().catalog().clone())
    }

    #[test]
    fn matrix_follows_active_zones() {
        let lookup = resolver();
        let index = index(&lookup);
        let mut ws = workspace();
        ws.select_zone(&code("N1"), &lookup).unwrap();
        ws.select_zone(&code("N2"), &lookup).unwrap();
        assert!(ws.grid().zones.is_empty());

        ws.auto_fill(&lookup, &index);
        assert_eq!(ws.grid().zones, vec![code("N1"), code("N2")]);
        ws.set_price(&code("N1"), &code("N2"), 55.0).unwrap();

        let capital = CityKey::new("New Delhi", "Delhi");
        ws.unassign_cities(&code("N1"), &[capital]).unwrap();
        assert_eq!(ws.grid().zones, vec![code("N2")]);
        assert!(matches!(
            ws.set_price(&code("N1"), &code("N2"), 10.0),
            Err(WorkspaceError::Matrix(MatrixError::InactiveZone { .. }))
        ));
        assert!(!ws.matrix().to_map().contains_key(&code("N1")));
    }

    #[test]
    fn multi_city_assignment_is_all_or_nothing() {
        let lookup = resolver();
        let index = index(&lookup);
        let mut ws = workspace();
        ws.select_zone(&code("W1"), &lookup).unwrap();
        let err = ws
            .assign_cities(
                &code("W1"),
                &[
                    CityKey::new("Mumbai", "Maharashtra"),
                    CityKey::new("Gurugram", "Haryana"),
                ],
                &lookup,
                &index,
            )
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::Assignment(AssignmentError::CityUnavailable { .. })));
        assert!(!ws.zone(&code("W1")).unwrap().is_active());
    }

    #[test]
    fn deselect_all_releases_cities() {
        let lookup = resolver();
        let index = index(&lookup);
        let mut ws = workspace();
        ws.select_all(&lookup);
        ws.auto_fill(&lookup, &index);
        assert_eq!(ws.active_zones().len(), 4);

        let removed = ws.deselect_all();
        assert_eq!(removed.len(), 4);
        assert!(ws.selected().is_empty());
        assert!(ws.grid().zones.is_empty());

        ws.select_zone(&code("N1"), &lookup).unwrap();
        ws.select_zone(&code("N2"), &lookup).unwrap();
        assert_eq!(
            ws.available_cities(&code("N2"), &lookup, &index).unwrap().len(),
            4
        );
    }

    #[test]
    fn finalize_requires_confirmation_for_empty_zones() {
        let lookup = resolver();
        let index = index(&lookup);
        let mut ws = workspace();
        ws.select_zone(&code("W1"), &lookup).unwrap();
        ws.select_zone(&code("X1"), &lookup).unwrap();
        ws.assign_cities(&code("W1"), &[CityKey::new("Pune", "Maharashtra")], &lookup, &index)
            .unwrap();

        let err = ws.finalize(false).unwrap_err();
        assert_eq!(err, WorkspaceError::EmptyZones { zones: vec!["X1".into()] });

        let output = ws.finalize(true).unwrap();
        assert_eq!(output.zones.len(), 1);
        assert_eq!(output.zones[0].zone_code, code("W1"));
        assert_eq!(output.price_matrix.len(), 1);
        assert_eq!(ws.snapshot().zones.len(), 2);
    }

    #[test]
    fn rebuilds_from_output_and_keeps_active_prices() {
        let lookup = resolver();
        let index = index(&lookup);
        let mut ws = workspace();
        ws.select_zone(&code("N1"), &lookup).unwrap();
        ws.select_zone(&code("W1"), &lookup).unwrap();
        ws.auto_fill(&lookup, &index);
        ws.paste_prices("0\t40\n45\t0").unwrap();

        let rebuilt = ZoneWorkspace::from_output(ws.finalize(false).unwrap(), &lookup).unwrap();
        assert_eq!(rebuilt.selected(), vec![code("N1"), code("W1")]);
        assert_eq!(rebuilt.matrix().price(&code("W1"), &code("N1")), Some(45.0));
        assert_eq!(rebuilt.grid(), ws.grid());
    }

    #[test]
    fn toggle_zone_keeps_assignments_in_step() {
        let lookup = resolver();
        let index = index(&lookup);
        let mut ws = workspace();
        assert!(ws.toggle_zone(&code("N1"), &lookup).unwrap());
        ws.auto_fill(&lookup, &index);
        assert!(ws.zone(&code("N1")).unwrap().is_active());

        assert!(!ws.toggle_zone(&code("N1"), &lookup).unwrap());
        assert!(ws.zone(&code("N1")).is_none());
        assert!(ws.grid().zones.is_empty());
        assert!(matches!(
            ws.toggle_zone(&code("N2"), &lookup),
            Err(WorkspaceError::Selection(SelectionError::OutOfSequence { .. }))
        ));
    }

    #[test]
    fn warns_when_capital_state_is_split() {
        let lookup = resolver();
        let mut ws = workspace();
        ws.select_zone(&code("N1"), &lookup).unwrap();
        assert!(ws.warnings(&lookup).is_empty());
        ws.select_zone(&code("N2"), &lookup).unwrap();
        assert_eq!(ws.warnings(&lookup)[0].state, "DELHI");
    }
}
