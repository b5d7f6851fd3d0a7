//! Cell in the hexagonal grid.

use serde::{Deserialize, Serialize};
use super::SuperCell;

/// Dense cell index, assigned in first-encounter order (0..N).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellIndex(pub u32);

impl CellIndex {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Encoding used in connection table slots.
    pub fn as_slot(self) -> i32 {
        self.0 as i32
    }

    /// Decode a connection table slot. `None` for the empty-slot sentinel.
    pub fn from_slot(slot: i32) -> Option<Self> {
        u32::try_from(slot).ok().map(CellIndex)
    }
}

impl std::fmt::Display for CellIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Row view of one cell, assembled from the graph's tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub index: CellIndex,
    pub hexid: String,
    pub k: f64,
    pub easting: f64,
    pub northing: f64,
    /// Owning super-cell, `None` when the record carried no `supercell` field.
    pub super_cell: Option<SuperCell>,
    pub neighbours: Vec<CellIndex>,
}

impl Cell {
    pub fn degree(&self) -> usize {
        self.neighbours.len()
    }

    pub fn is_isolated(&self) -> bool {
        self.neighbours.is_empty()
    }

    /// Inbound boundary resistance, 0.0 outside any super-cell.
    pub fn in_resistance(&self) -> f64 {
        self.super_cell.as_ref().map_or(0.0, |s| s.in_resistance)
    }

    /// Outbound boundary resistance, 0.0 outside any super-cell.
    pub fn out_resistance(&self) -> f64 {
        self.super_cell.as_ref().map_or(0.0, |s| s.out_resistance)
    }
}
