//! Dense fixed-width tables: connections, weights, slot directions.
//!
//! All three tables have shape `(cell_count, DEGREE)` and share one
//! layout rule: row `i` belongs to the cell with dense index `i`, and
//! populated slots form a prefix filled in record order.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{CellIndex, Direction, DEGREE};

/// Empty connection slot.
pub const NO_NEIGHBOUR: i32 = -1;

/// Empty weight slot.
pub const NO_WEIGHT: f64 = -1.0;

// ============================================================================
// Cumulative weights
// ============================================================================

/// Cumulative weight row for `populated` occupied slots.
///
/// Slot `k` (0-based) of the prefix holds `(k + 1) / populated`; the last
/// populated slot is written as exactly `1.0`. Everything else is
/// [`NO_WEIGHT`]. A row for zero slots is all sentinel.
pub fn cumulative_weights(populated: usize) -> [f64; DEGREE] {
    let mut row = [NO_WEIGHT; DEGREE];
    let m = populated.min(DEGREE);
    if m == 0 {
        return row;
    }
    for (k, slot) in row.iter_mut().enumerate().take(m - 1) {
        *slot = (k + 1) as f64 / m as f64;
    }
    row[m - 1] = 1.0;
    row
}

// ============================================================================
// ConnectionTable
// ============================================================================

/// Neighbour indices per cell, [`NO_NEIGHBOUR`] in unused slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionTable {
    rows: Vec<[i32; DEGREE]>,
}

impl ConnectionTable {
    pub fn new(cell_count: usize) -> Self {
        Self { rows: vec![[NO_NEIGHBOUR; DEGREE]; cell_count] }
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), DEGREE)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, cell: CellIndex) -> Option<&[i32; DEGREE]> {
        self.rows.get(cell.as_usize())
    }

    pub fn rows(&self) -> &[[i32; DEGREE]] {
        &self.rows
    }

    pub(crate) fn row_mut(&mut self, cell: CellIndex) -> &mut [i32; DEGREE] {
        &mut self.rows[cell.as_usize()]
    }

    /// Populated slots of a row, in slot order.
    pub fn neighbours(&self, cell: CellIndex) -> SmallVec<[CellIndex; DEGREE]> {
        self.row(cell)
            .map(|row| row.iter().copied().map_while(CellIndex::from_slot).collect())
            .unwrap_or_default()
    }

    /// Number of populated slots in a row.
    pub fn degree(&self, cell: CellIndex) -> usize {
        self.row(cell)
            .map_or(0, |row| row.iter().take_while(|&&s| s != NO_NEIGHBOUR).count())
    }
}

// ============================================================================
// WeightTable
// ============================================================================

/// Cumulative neighbour-selection weights, aligned with [`ConnectionTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    rows: Vec<[f64; DEGREE]>,
}

impl WeightTable {
    pub fn new(cell_count: usize) -> Self {
        Self { rows: vec![[NO_WEIGHT; DEGREE]; cell_count] }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), DEGREE)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, cell: CellIndex) -> Option<&[f64; DEGREE]> {
        self.rows.get(cell.as_usize())
    }

    pub fn rows(&self) -> &[[f64; DEGREE]] {
        &self.rows
    }

    pub(crate) fn set_row(&mut self, cell: CellIndex, row: [f64; DEGREE]) {
        self.rows[cell.as_usize()] = row;
    }

    /// Slot picked by a uniform draw in `[0, 1)`.
    ///
    /// Scans the populated prefix for the first weight strictly greater
    /// than `draw`. `None` for isolated cells, unknown rows, or a draw
    /// outside `[0, 1)`.
    pub fn select_slot(&self, cell: CellIndex, draw: f64) -> Option<usize> {
        if !(0.0..1.0).contains(&draw) {
            return None;
        }
        self.row(cell)?
            .iter()
            .take_while(|&&w| w != NO_WEIGHT)
            .position(|&w| w > draw)
    }
}

// ============================================================================
// DirectionTable
// ============================================================================

/// Compass direction each populated connection slot came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionTable {
    rows: Vec<[Option<Direction>; DEGREE]>,
}

impl DirectionTable {
    pub fn new(cell_count: usize) -> Self {
        Self { rows: vec![[None; DEGREE]; cell_count] }
    }

    pub fn row(&self, cell: CellIndex) -> Option<&[Option<Direction>; DEGREE]> {
        self.rows.get(cell.as_usize())
    }

    /// Slot holding the neighbour in `dir`, if that neighbour was kept.
    pub fn slot_of(&self, cell: CellIndex, dir: Direction) -> Option<usize> {
        self.row(cell)?.iter().position(|d| *d == Some(dir))
    }

    pub(crate) fn row_mut(&mut self, cell: CellIndex) -> &mut [Option<Direction>; DEGREE] {
        &mut self.rows[cell.as_usize()]
    }
}
