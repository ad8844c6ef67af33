use super::dto::{ColumnMapping, IssueKind, ParseIssue, ParsedPincodeEntry};
use super::predicates::parse_bool;
use crate::domain::pincode::value_objects::normalize_pincode;
use crate::domain::reference::index::ReferenceIndex;
use crate::domain::shared::names::{is_placeholder, place_key};
use crate::domain::zone::value_objects::ZoneCode;
use std::collections::HashMap;

#[derive(Debug, Default, PartialEq)]
pub struct RowOutcome {
    pub entries: Vec<ParsedPincodeEntry>,
    /// At most `max_errors` issues, in row order.
    pub errors: Vec<ParseIssue>,
    pub error_count: usize,
    pub warnings: Vec<ParseIssue>,
}

impl RowOutcome {
    fn error(&mut self, issue: ParseIssue, max_errors: usize) {
        self.error_count += 1;
        if self.errors.len() < max_errors {
            self.errors.push(issue);
        }
    }
}

/// Turns data rows into entries using the detected columns.
///
/// `first_row` is the 1-based file row number of `rows[0]`. Rows with a bad
/// pincode or zone become errors; repeated pincodes become warnings and are
/// skipped. State and city come from the reference index when the pincode
/// is known there, otherwise from the file's own columns.
pub fn parse_rows(
    rows: &[Vec<String>],
    first_row: usize,
    mapping: &ColumnMapping,
    index: &ReferenceIndex,
    max_errors: usize,
) -> RowOutcome {
    let mut outcome = RowOutcome::default();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (offset, row) in rows.iter().enumerate() {
        let row_number = first_row + offset;
        let raw_pincode = cell(row, mapping.pincode);
        let raw_zone = cell(row, mapping.zone);

        let pincode = if raw_pincode.is_empty() {
            outcome.error(
                ParseIssue::at_row(row_number, IssueKind::MissingData, "Pincode is missing", None),
                max_errors,
            );
            continue;
        } else {
            match normalize_pincode(raw_pincode) {
                Some(pincode) => pincode,
                None => {
                    outcome.error(
                        ParseIssue::at_row(
                            row_number,
                            IssueKind::InvalidPincode,
                            format!("'{}' is not a valid 6-digit pincode", raw_pincode),
                            Some(raw_pincode),
                        ),
                        max_errors,
                    );
                    continue;
                }
            }
        };

        let zone = if raw_zone.is_empty() {
            outcome.error(
                ParseIssue::at_row(row_number, IssueKind::MissingData, "Zone is missing", None),
                max_errors,
            );
            continue;
        } else {
            match ZoneCode::parse(raw_zone) {
                Some(zone) => zone,
                None => {
                    outcome.error(
                        ParseIssue::at_row(
                            row_number,
                            IssueKind::InvalidZone,
                            format!("'{}' is not a recognised zone code", raw_zone),
                            Some(raw_zone),
                        ),
                        max_errors,
                    );
                    continue;
                }
            }
        };

        if let Some(first) = seen.get(&pincode) {
            outcome.warnings.push(ParseIssue::at_row(
                row_number,
                IssueKind::Duplicate,
                format!("Pincode {} already listed on row {}; skipped", pincode, first),
                Some(&pincode),
            ));
            continue;
        }
        seen.insert(pincode.clone(), row_number);

        let raw_oda = cell(row, mapping.oda);
        let is_oda = if raw_oda.is_empty() {
            false
        } else {
            parse_bool(raw_oda).unwrap_or_else(|| {
                outcome.warnings.push(ParseIssue::at_row(
                    row_number,
                    IssueKind::InvalidOda,
                    format!("ODA value '{}' is not true/false; treated as false", raw_oda),
                    Some(raw_oda),
                ));
                false
            })
        };

        let (state, city) = match index.record_of(&pincode) {
            Some(record) => (Some(record.state.clone()), Some(record.city.clone())),
            None => (
                place_cell(cell(row, mapping.state)),
                place_cell(cell(row, mapping.city)),
            ),
        };

        outcome.entries.push(ParsedPincodeEntry {
            pincode,
            zone,
            is_oda,
            state,
            city,
            source_row: row_number,
        });
    }

    outcome
}

fn cell(row: &[String], column: Option<usize>) -> &str {
    column
        .and_then(|c| row.get(c))
        .map(|value| value.trim())
        .unwrap_or("")
}

fn place_cell(raw: &str) -> Option<String> {
    (!is_placeholder(raw)).then(|| place_key(raw))
}
