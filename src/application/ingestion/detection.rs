//! Header and column-role detection.
//!
//! Everything here is a pure function of cell text, so detection can be
//! exercised with literal tables instead of real files.

use super::dto::{ColumnMapping, ColumnRole, RoleCandidate};
use super::predicates::{header_role, looks_like_label, matches_role};

/// Confidence assigned to a header keyword match.
pub const HEADER_CONFIDENCE: f64 = 0.95;
/// A role is only assigned above this confidence.
pub const MIN_CONFIDENCE: f64 = 0.4;
/// Share of header-like cells needed to treat the first row as a header.
const HEADER_THRESHOLD: f64 = 0.4;

/// One column as seen by the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub index: usize,
    pub header: String,
    /// Role named by the header cell, when the table has a header row.
    pub header_role: Option<ColumnRole>,
    /// Non-empty sample values from the data rows.
    pub samples: Vec<String>,
}

pub fn is_header_row(row: &[String], is_known_state: &dyn Fn(&str) -> bool) -> bool {
    if row.is_empty() {
        return false;
    }
    let hits = row
        .iter()
        .filter(|cell| header_role(cell).is_some() || looks_like_label(cell, is_known_state))
        .count();
    hits as f64 / row.len() as f64 > HEADER_THRESHOLD
}

/// Column names for a table: the header row's cells, or `Column N` when
/// there is no header. Blank header cells are named positionally too.
pub fn column_names(header: Option<&[String]>, width: usize) -> Vec<String> {
    (0..width)
        .map(|i| {
            header
                .and_then(|h| h.get(i))
                .map(|cell| cell.trim())
                .filter(|cell| !cell.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Column {}", i + 1))
        })
        .collect()
}

/// Builds one profile per column, sampling at most `sample_size` non-empty
/// values from the data rows.
pub fn profile_columns(
    names: &[String],
    has_header: bool,
    data: &[Vec<String>],
    sample_size: usize,
) -> Vec<ColumnProfile> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| ColumnProfile {
            index,
            header: name.clone(),
            header_role: if has_header { header_role(name) } else { None },
            samples: data
                .iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.trim())
                .filter(|cell| !cell.is_empty())
                .take(sample_size)
                .map(str::to_string)
                .collect(),
        })
        .collect()
}

/// Every `(column, role)` pair with non-zero confidence, best first; equal
/// confidences keep column order.
pub fn rank_candidates(
    columns: &[ColumnProfile],
    is_known_state: &dyn Fn(&str) -> bool,
) -> Vec<RoleCandidate> {
    let mut candidates: Vec<RoleCandidate> = columns
        .iter()
        .flat_map(|column| {
            ColumnRole::PRIORITY.into_iter().filter_map(move |role| {
                let confidence = column_confidence(column, role, is_known_state);
                (confidence > 0.0).then(|| RoleCandidate {
                    column: column.index,
                    header: column.header.clone(),
                    role,
                    confidence,
                })
            })
        })
        .collect();
    candidates.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then(a.column.cmp(&b.column))
    });
    candidates
}

fn column_confidence(
    column: &ColumnProfile,
    role: ColumnRole,
    is_known_state: &dyn Fn(&str) -> bool,
) -> f64 {
    if column.header_role == Some(role) {
        return HEADER_CONFIDENCE;
    }
    if column.samples.is_empty() {
        return 0.0;
    }
    let hits = column
        .samples
        .iter()
        .filter(|value| matches_role(role, value, is_known_state))
        .count();
    hits as f64 / column.samples.len() as f64
}

/// Gives each role, in priority order, its best remaining column above
/// [`MIN_CONFIDENCE`]. A column serves at most one role.
pub fn assign_roles(ranked: &[RoleCandidate]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();
    let mut taken: Vec<usize> = Vec::new();
    for role in ColumnRole::PRIORITY {
        let best = ranked
            .iter()
            .filter(|c| c.role == role && c.confidence > MIN_CONFIDENCE)
            .find(|c| !taken.contains(&c.column));
        if let Some(candidate) = best {
            taken.push(candidate.column);
            mapping.set(role, candidate.column);
            mapping.detections.push(candidate.clone());
        }
    }
    mapping
}
