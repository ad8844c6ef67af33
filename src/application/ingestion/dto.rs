use crate::domain::zone::{
    entity::ZoneConfigurationOutput,
    value_objects::{Region, ZoneCode},
};
use bytes::Bytes;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone)]
pub struct IngestZoneFileRequest {
    pub file_name: String,
    pub data: Bytes,
    pub vendor_id: Option<String>,
}

/// One accepted row of an uploaded zone file.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ParsedPincodeEntry {
    pub pincode: String,
    pub zone: ZoneCode,
    pub is_oda: bool,
    pub state: Option<String>,
    pub city: Option<String>,
    /// 1-based row number in the uploaded file, header included.
    pub source_row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum IssueKind {
    InvalidPincode,
    InvalidZone,
    MissingData,
    Duplicate,
    FormatError,
    InvalidOda,
    CityConflict,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ParseIssue {
    pub row: Option<usize>,
    pub kind: IssueKind,
    pub message: String,
    pub value: Option<String>,
}

impl ParseIssue {
    pub fn at_row(row: usize, kind: IssueKind, message: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            row: Some(row),
            kind,
            message: message.into(),
            value: value.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ColumnRole {
    Pincode,
    Zone,
    Oda,
    State,
    City,
}

impl ColumnRole {
    /// Order in which roles claim columns.
    pub const PRIORITY: [ColumnRole; 5] = [
        ColumnRole::Pincode,
        ColumnRole::Zone,
        ColumnRole::Oda,
        ColumnRole::State,
        ColumnRole::City,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ColumnRole::Pincode => "pincode",
            ColumnRole::Zone => "zone",
            ColumnRole::Oda => "ODA",
            ColumnRole::State => "state",
            ColumnRole::City => "city",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RoleCandidate {
    pub column: usize,
    pub header: String,
    pub role: ColumnRole,
    pub confidence: f64,
}

/// Column index chosen for each role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ColumnMapping {
    pub pincode: Option<usize>,
    pub zone: Option<usize>,
    pub oda: Option<usize>,
    pub state: Option<usize>,
    pub city: Option<usize>,
    pub detections: Vec<RoleCandidate>,
}

impl ColumnMapping {
    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        match role {
            ColumnRole::Pincode => self.pincode,
            ColumnRole::Zone => self.zone,
            ColumnRole::Oda => self.oda,
            ColumnRole::State => self.state,
            ColumnRole::City => self.city,
        }
    }

    pub fn set(&mut self, role: ColumnRole, column: usize) {
        let slot = match role {
            ColumnRole::Pincode => &mut self.pincode,
            ColumnRole::Zone => &mut self.zone,
            ColumnRole::Oda => &mut self.oda,
            ColumnRole::State => &mut self.state,
            ColumnRole::City => &mut self.city,
        };
        *slot = Some(column);
    }

    pub fn confidence(&self, role: ColumnRole) -> Option<f64> {
        self.detections
            .iter()
            .find(|c| c.role == role)
            .map(|c| c.confidence)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ZoneSummary {
    pub zone_code: ZoneCode,
    pub region: Option<Region>,
    pub pincode_count: usize,
    pub city_count: usize,
    pub state_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SourceFormat {
    Delimited,
    Workbook,
}

/// Everything an operator needs to review an upload.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct IngestionReport {
    pub file_name: String,
    pub format: SourceFormat,
    /// Hex SHA-256 of the uploaded bytes.
    pub fingerprint: String,
    pub header_detected: bool,
    pub headers: Vec<String>,
    pub columns: ColumnMapping,
    /// Data rows seen, header excluded.
    pub total_rows: usize,
    pub valid_rows: usize,
    pub entries: Vec<ParsedPincodeEntry>,
    /// First reported row errors; `error_count` has the full total.
    pub errors: Vec<ParseIssue>,
    pub error_count: usize,
    pub warnings: Vec<ParseIssue>,
    pub summary: Vec<ZoneSummary>,
    pub configuration: ZoneConfigurationOutput,
}
