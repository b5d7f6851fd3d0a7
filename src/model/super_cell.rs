//! Super-cells: named groups of cells sharing boundary resistances.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// A super-cell record, immutable once indexed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuperCell {
    /// Dense index, the position of the defining `SuperCells` record.
    pub index: i64,
    /// Resistance to entering the group, as a fraction.
    pub in_resistance: f64,
    /// Resistance to leaving the group, as a fraction.
    pub out_resistance: f64,
}

/// External id → super-cell, remembering the order names were first seen.
///
/// A repeated id replaces the record but keeps its original position in
/// [`SuperCellMap::names`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuperCellMap {
    by_id: HashMap<String, SuperCell>,
    order: Vec<String>,
}

impl SuperCellMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the replaced record, if any.
    pub fn insert(&mut self, id: impl Into<String>, record: SuperCell) -> Option<SuperCell> {
        let id = id.into();
        match self.by_id.insert(id.clone(), record) {
            Some(previous) => Some(previous),
            None => {
                self.order.push(id);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&SuperCell> {
        self.by_id.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SuperCell)> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id).map(|rec| (id.as_str(), rec)))
    }
}
