//! # Hex-Grid Graph Model
//!
//! DTOs for the dense hexagonal cell graph.
//! These types cross every boundary: xml ↔ index ↔ build ↔ sink ↔ user.
//!
//! Design rule: NO quick-xml types, NO Arrow types here.
//! This module is pure data — no I/O, no logging.

pub mod cell;
pub mod direction;
pub mod super_cell;
pub mod tables;
pub mod attributes;

pub use cell::{CellIndex, Cell};
pub use direction::{Direction, DEGREE};
pub use super_cell::{SuperCell, SuperCellMap};
pub use tables::{
    ConnectionTable, WeightTable, DirectionTable,
    cumulative_weights, NO_NEIGHBOUR, NO_WEIGHT,
};
pub use attributes::{AttributeTable, Column, ColumnData};
