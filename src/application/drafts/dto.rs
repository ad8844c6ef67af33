use crate::domain::draft::entity::{DraftSource, VendorZoneDraft};
use crate::domain::pricing::matrix::PriceGrid;
use crate::domain::zone::{
    entity::{CityKey, ZoneConfig},
    value_objects::{Region, ZoneCode},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateDraftRequest {
    #[validate(length(min = 1, max = 64, message = "Vendor id must be 1-64 characters"))]
    pub vendor_id: Option<String>,
}

/// Cities as `"CITY||STATE"` keys.
#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export)]
pub struct CitiesRequest {
    #[validate(length(min = 1, message = "At least one city is required"))]
    pub cities: Vec<String>,
}

impl CitiesRequest {
    pub fn city_keys(&self) -> Result<Vec<CityKey>, String> {
        self.cities
            .iter()
            .map(|raw| {
                CityKey::parse(raw)
                    .ok_or_else(|| format!("'{}' is not a CITY||STATE key", raw))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export)]
pub struct StateRequest {
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct CompleteZoneRequest {
    #[serde(default = "default_true")]
    pub complete: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct PriceCellRequest {
    pub from: String,
    pub to: String,
    pub price: f64,
}

/// Tab/newline separated block, as copied from a spreadsheet.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct PasteRequest {
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FinalizeRequest {
    #[serde(default)]
    pub confirm_empty_zones: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegionProgress {
    pub region: Region,
    pub zones: Vec<ZoneCode>,
    pub selected: Vec<ZoneCode>,
    /// Zone the sequence rule allows next; `None` once the region is full.
    pub next_selectable: Option<ZoneCode>,
}

/// Everything the editing screens need to render one draft.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DraftView {
    pub id: Uuid,
    pub vendor_id: Option<String>,
    pub source: DraftSource,
    pub regions: Vec<RegionProgress>,
    pub selected: Vec<ZoneCode>,
    pub zones: Vec<ZoneConfig>,
    pub active_zones: Vec<ZoneCode>,
    pub empty_zones: Vec<ZoneCode>,
    pub price_grid: PriceGrid,
    pub oda_pincodes: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&VendorZoneDraft> for DraftView {
    fn from(draft: &VendorZoneDraft) -> Self {
        let workspace = &draft.workspace;
        let catalog = workspace.catalog();
        let selected = workspace.selected();
        let regions = catalog
            .regions()
            .map(|region| RegionProgress {
                region,
                zones: catalog.zones_of(region).to_vec(),
                selected: selected
                    .iter()
                    .filter(|code| catalog.region_of(code) == Some(region))
                    .cloned()
                    .collect(),
                next_selectable: workspace.next_selectable(region),
            })
            .collect();

        Self {
            id: draft.id,
            vendor_id: draft.vendor_id.clone(),
            source: draft.source,
            regions,
            zones: workspace.zones().into_iter().cloned().collect(),
            active_zones: workspace.active_zones(),
            empty_zones: workspace.empty_zones(),
            price_grid: workspace.grid(),
            oda_pincodes: workspace.oda_pincodes().map(<[String]>::to_vec),
            selected,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        }
    }
}
