//! Per-cell attribute columns.
//!
//! The column set is fixed: every graph carries exactly the six columns
//! named by [`Column`], each of length `cell_count`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CellIndex, SuperCell};

/// Attribute column names, as exposed to sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    K,
    InRes,
    OutRes,
    SuperCell,
    Easting,
    Northing,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::K,
        Column::InRes,
        Column::OutRes,
        Column::SuperCell,
        Column::Easting,
        Column::Northing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::K => "K",
            Column::InRes => "in_res",
            Column::OutRes => "out_res",
            Column::SuperCell => "super_cell",
            Column::Easting => "easting",
            Column::Northing => "northing",
        }
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown attribute column: {s}"))
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Borrowed column data, for sinks that address columns by name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnData<'a> {
    Float(&'a [f64]),
    Int(&'a [i64]),
}

impl ColumnData<'_> {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(v) => v.len(),
            ColumnData::Int(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Columnar per-cell attributes, aligned by dense cell index.
///
/// Defaults are zero: a cell without a `supercell` field keeps
/// `super_cell == 0`, `in_res == out_res == 0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeTable {
    #[serde(rename = "K")]
    pub k: Vec<f64>,
    pub in_res: Vec<f64>,
    pub out_res: Vec<f64>,
    pub super_cell: Vec<i64>,
    pub easting: Vec<f64>,
    pub northing: Vec<f64>,
}

impl AttributeTable {
    pub fn new(cell_count: usize) -> Self {
        Self {
            k: vec![0.0; cell_count],
            in_res: vec![0.0; cell_count],
            out_res: vec![0.0; cell_count],
            super_cell: vec![0; cell_count],
            easting: vec![0.0; cell_count],
            northing: vec![0.0; cell_count],
        }
    }

    pub fn len(&self) -> usize {
        self.k.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }

    pub fn column(&self, column: Column) -> ColumnData<'_> {
        match column {
            Column::K => ColumnData::Float(&self.k),
            Column::InRes => ColumnData::Float(&self.in_res),
            Column::OutRes => ColumnData::Float(&self.out_res),
            Column::SuperCell => ColumnData::Int(&self.super_cell),
            Column::Easting => ColumnData::Float(&self.easting),
            Column::Northing => ColumnData::Float(&self.northing),
        }
    }

    pub fn column_by_name(&self, name: &str) -> Option<ColumnData<'_>> {
        name.parse::<Column>().ok().map(|c| self.column(c))
    }

    /// True when every column has the same length.
    pub fn is_aligned(&self) -> bool {
        Column::ALL.iter().all(|&c| self.column(c).len() == self.len())
    }

    /// Copy a super-cell's index and resistances onto a cell.
    pub(crate) fn assign_super_cell(&mut self, cell: CellIndex, group: &SuperCell) {
        let i = cell.as_usize();
        self.super_cell[i] = group.index;
        self.in_res[i] = group.in_resistance;
        self.out_res[i] = group.out_resistance;
    }
}
