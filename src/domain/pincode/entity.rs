use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// One row of the static pincode reference table.
///
/// `state` and `city` are stored as uppercase comparison keys (see
/// [`crate::domain::shared::names::place_key`]); `zone` is advisory and is
/// never used to decide zone membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PincodeRecord {
    pub pincode: String,
    #[serde(default)]
    pub zone: Option<String>,
    pub state: String,
    pub city: String,
}

/// Unvalidated reference row as it arrives from the pincode table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPincodeRow {
    #[serde(
        alias = "Pincode",
        alias = "pin",
        alias = "pin_code",
        deserialize_with = "string_or_number"
    )]
    pub pincode: String,
    #[serde(default, alias = "Zone")]
    pub zone: Option<String>,
    #[serde(default, alias = "State", alias = "statename")]
    pub state: String,
    #[serde(default, alias = "City", alias = "district", alias = "District")]
    pub city: String,
}

/// Reference tables exported from spreadsheets store pincodes as numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(u64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Int(value) => value.to_string(),
        Raw::Float(value) => value.to_string(),
    })
}
