use super::paste::parse_price_block;
use crate::domain::zone::value_objects::ZoneCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use ts_rs::TS;

/// Wire form of the price table: origin zone → destination zone → price.
pub type PriceMatrixMap = BTreeMap<ZoneCode, BTreeMap<ZoneCode, f64>>;

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum MatrixError {
    #[error("Zone {zone} has no assigned cities and cannot be priced")]
    InactiveZone { zone: String },

    #[error("Price for {from} → {to} must be a non-negative number, got {value}")]
    InvalidPrice { from: String, to: String, value: f64 },

    #[error(
        "Pasted block has {actual} rows but {expected} zones are active; paste exactly {expected} rows × {expected} columns in the displayed zone order"
    )]
    RowCountMismatch { expected: usize, actual: usize },

    #[error(
        "Row {row} of the pasted block has {actual} columns but {expected} zones are active; paste exactly {expected} rows × {expected} columns in the displayed zone order"
    )]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Cell at row {row}, column {column} is not a valid price: '{value}'")]
    InvalidCell {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("Pasted block is empty")]
    EmptyPaste,
}

/// Square price table over exactly the active zone set.
///
/// # Invariants
/// - both key levels of `prices` equal the set of `zones`
/// - `zones` is in display order and holds no duplicates
/// - every stored price is finite and non-negative
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceMatrix {
    zones: Vec<ZoneCode>,
    prices: PriceMatrixMap,
}

/// Display-ordered view of the matrix for the editing grid.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceGrid {
    pub zones: Vec<ZoneCode>,
    pub rows: Vec<Vec<f64>>,
}

impl PriceMatrix {
    pub fn new(zones: &[ZoneCode]) -> Self {
        let mut matrix = Self::default();
        matrix.sync_zones(zones);
        matrix
    }

    /// Rebuilds a matrix from a wire map, keeping only prices between the
    /// given active zones. Missing cells start at zero.
    pub fn from_map(zones: &[ZoneCode], map: &PriceMatrixMap) -> Self {
        let mut matrix = Self::new(zones);
        for (from, row) in map {
            for (to, price) in row {
                if matrix.is_active(from)
                    && matrix.is_active(to)
                    && price.is_finite()
                    && *price >= 0.0
                {
                    matrix.store(from, to, *price);
                }
            }
        }
        matrix
    }

    pub fn zones(&self) -> &[ZoneCode] {
        &self.zones
    }

    pub fn is_active(&self, zone: &ZoneCode) -> bool {
        self.zones.contains(zone)
    }

    /// Re-keys the table to `active`, in that order.
    ///
    /// Prices between zones that stay active are preserved, cells for newly
    /// active zones start at zero and rows/columns of zones that left the set
    /// are dropped. Returns whether the key set changed.
    pub fn sync_zones(&mut self, active: &[ZoneCode]) -> bool {
        let mut next: Vec<ZoneCode> = Vec::with_capacity(active.len());
        for zone in active {
            if !next.contains(zone) {
                next.push(zone.clone());
            }
        }
        let changed = next != self.zones;

        let mut prices = PriceMatrixMap::new();
        for from in &next {
            let row = next
                .iter()
                .map(|to| (to.clone(), self.price(from, to).unwrap_or(0.0)))
                .collect();
            prices.insert(from.clone(), row);
        }

        self.zones = next;
        self.prices = prices;
        changed
    }

    pub fn price(&self, from: &ZoneCode, to: &ZoneCode) -> Option<f64> {
        self.prices.get(from).and_then(|row| row.get(to)).copied()
    }

    /// Writes one cell. Rejected, not clamped, when either zone is inactive
    /// or the price is negative or not finite.
    pub fn set_price(&mut self, from: &ZoneCode, to: &ZoneCode, price: f64) -> Result<(), MatrixError> {
        for zone in [from, to] {
            if !self.is_active(zone) {
                return Err(MatrixError::InactiveZone {
                    zone: zone.to_string(),
                });
            }
        }
        if !price.is_finite() || price < 0.0 {
            return Err(MatrixError::InvalidPrice {
                from: from.to_string(),
                to: to.to_string(),
                value: price,
            });
        }
        self.store(from, to, price);
        Ok(())
    }

    /// Replaces the whole table from pasted text. The block must be exactly
    /// N×N for N active zones in display order; nothing is written unless
    /// every cell parses.
    pub fn apply_paste(&mut self, text: &str) -> Result<usize, MatrixError> {
        let rows = parse_price_block(text)?;
        let expected = self.zones.len();
        if rows.len() != expected {
            return Err(MatrixError::RowCountMismatch {
                expected,
                actual: rows.len(),
            });
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != expected) {
            return Err(MatrixError::ColumnCountMismatch {
                row: index + 1,
                expected,
                actual: row.len(),
            });
        }

        let zones = self.zones.clone();
        for (from, row) in zones.iter().zip(&rows) {
            for (to, price) in zones.iter().zip(row) {
                self.store(from, to, *price);
            }
        }
        Ok(expected * expected)
    }

    pub fn grid(&self) -> PriceGrid {
        let rows = self
            .zones
            .iter()
            .map(|from| {
                self.zones
                    .iter()
                    .map(|to| self.price(from, to).unwrap_or(0.0))
                    .collect()
            })
            .collect();
        PriceGrid {
            zones: self.zones.clone(),
            rows,
        }
    }

    pub fn to_map(&self) -> PriceMatrixMap {
        self.prices.clone()
    }

    fn store(&mut self, from: &ZoneCode, to: &ZoneCode, price: f64) {
        if let Some(row) = self.prices.get_mut(from) {
            row.insert(to.clone(), price);
        }
    }
}
