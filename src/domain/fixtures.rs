//! Small North/West/Special reference world shared by domain unit tests.

use crate::domain::blueprint::{resolver::BlueprintResolver, schema::BlueprintSchema};
use crate::domain::pincode::entity::RawPincodeRow;
use crate::domain::reference::index::ReferenceIndex;
use crate::domain::zone::value_objects::ZoneCode;

pub const BLUEPRINT_JSON: &str = r#"{
    "regions": {"North": ["N1", "N2"], "West": ["W1"], "Special": ["X1"]},
    "zones": {
        "N1": {"region": "North", "rawEntries": [{"state": "Delhi", "cities": ["New Delhi"]}]},
        "N2": {"region": "North", "rawEntries": [{"state": "Delhi", "cities": []}, {"state": "Haryana", "cities": []}]},
        "W1": {"region": "West", "rawEntries": [{"state": "Maharashtra", "cities": []}]},
        "X1": {"region": "Special", "rawEntries": [{"state": "Andaman & Nicobar Islands", "cities": []}]}
    },
    "stateIndex": {
        "DELHI": {"zones": ["N1", "N2"], "capitalZones": ["N1"]},
        "HARYANA": {"zones": ["N2"], "capitalZones": []},
        "MAHARASHTRA": {"zones": ["W1"], "capitalZones": []},
        "ANDAMAN AND NICOBAR ISLANDS": {"zones": ["X1"], "capitalZones": []}
    }
}"#;

const ROWS: &[(&str, &str, &str)] = &[
    ("110001", "Delhi", "New Delhi"),
    ("110002", "Delhi", "New Delhi"),
    ("110075", "Delhi", "Dwarka"),
    ("122001", "Haryana", "Gurugram"),
    ("134109", "Haryana", "Panchkula"),
    ("400001", "Maharashtra", "Mumbai"),
    ("411001", "Maharashtra", "Pune"),
    ("744101", "Andaman & Nicobar Islands", "Port Blair"),
];

pub fn resolver() -> BlueprintResolver {
    let schema: BlueprintSchema = serde_json::from_str(BLUEPRINT_JSON).unwrap();
    BlueprintResolver::from_schema(schema).unwrap()
}

pub fn index(resolver: &BlueprintResolver) -> ReferenceIndex {
    let rows = ROWS.iter().map(|(pincode, state, city)| RawPincodeRow {
        pincode: pincode.to_string(),
        zone: None,
        state: state.to_string(),
        city: city.to_string(),
    });
    ReferenceIndex::build(rows, resolver)
}

pub fn code(raw: &str) -> ZoneCode {
    ZoneCode::parse(raw).unwrap()
}
