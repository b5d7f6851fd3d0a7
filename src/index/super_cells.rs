//! Super-cell indexing.

use crate::model::{SuperCell, SuperCellMap};
use crate::xml::{Record, SUPER_CELLS_TAG};
use crate::{Error, Result};

use super::parse_decimal;

pub const ID_TAG: &str = "ID";
pub const IN_RESISTANCE_TAG: &str = "InResistance";
pub const OUT_RESISTANCE_TAG: &str = "OutResistance";

/// Reads `SuperCells` records into a [`SuperCellMap`].
#[derive(Debug, Clone, Copy)]
pub struct SuperCellIndexer {
    divisor: f64,
}

impl SuperCellIndexer {
    pub fn new(divisor: f64) -> Self {
        Self { divisor }
    }

    /// Index every record in order.
    ///
    /// A record's index is its position among all `SuperCells` records, so a
    /// repeated `ID` takes the later position and leaves the earlier index
    /// unused. When a tag repeats inside one record, the last one wins.
    pub fn index(&self, records: &[Record]) -> Result<SuperCellMap> {
        let mut map = SuperCellMap::new();
        for (position, record) in records.iter().enumerate() {
            let id = required(record, ID_TAG)?;
            let in_raw = parse_decimal(IN_RESISTANCE_TAG, required(record, IN_RESISTANCE_TAG)?)?;
            let out_raw = parse_decimal(OUT_RESISTANCE_TAG, required(record, OUT_RESISTANCE_TAG)?)?;

            let group = SuperCell {
                index: position as i64,
                in_resistance: in_raw / self.divisor,
                out_resistance: out_raw / self.divisor,
            };
            if map.insert(id, group).is_some() {
                tracing::warn!(id, index = position, "super-cell redefined, later record wins");
            }
        }
        tracing::debug!(records = records.len(), distinct = map.len(), "indexed super-cells");
        Ok(map)
    }
}

fn required<'r>(record: &'r Record, tag: &str) -> Result<&'r str> {
    record.last(tag).ok_or_else(|| Error::MalformedRecord {
        element: SUPER_CELLS_TAG.to_string(),
        field: tag.to_string(),
    })
}
