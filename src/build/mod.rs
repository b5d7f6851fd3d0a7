//! Second pass: neighbour slots, attributes and weights.
//!
//! Each `AllCellData` record is walked field by field, in document order:
//!
//! ```text
//! <N>h7</N>          → next free slot ← index(h7)
//! <NE>b</NE>         → skipped, slot not consumed
//! <SE>ghost</SE>     → unknown id, skipped like a boundary
//! <K>0.3</K>         → attributes.K
//! <supercell>A</supercell> → attributes.{super_cell, in_res, out_res}
//! <easting>..</easting>, <northing>..</northing>
//! ```
//!
//! Once every record is placed, [`weights::fill_weights`] writes the
//! cumulative weight row for each cell's populated prefix.

mod weights;

pub use weights::fill_weights;

use serde::{Deserialize, Serialize};

use crate::index::{self, CellIds};
use crate::model::{
    AttributeTable, CellIndex, ConnectionTable, Direction, DirectionTable,
    SuperCellMap, WeightTable, DEGREE,
};
use crate::xml::Record;
use crate::{Error, Result};

pub const K_TAG: &str = "K";
pub const SUPER_CELL_TAG: &str = "supercell";
pub const EASTING_TAG: &str = "easting";
pub const NORTHING_TAG: &str = "northing";

/// Counters collected while building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Populated connection slots over all cells.
    pub links: usize,
    /// Directional fields holding the boundary marker.
    pub boundary_refs: usize,
    /// Directional fields naming an id that is not a cell.
    pub unknown_refs: usize,
    /// Cells with no populated slot.
    pub isolated: usize,
}

/// Everything the second pass produces.
#[derive(Debug, Clone)]
pub struct Adjacency {
    pub connections: ConnectionTable,
    pub weights: WeightTable,
    pub directions: DirectionTable,
    pub attributes: AttributeTable,
    /// Super-cell id each cell referenced, by dense index.
    pub memberships: Vec<Option<String>>,
    pub stats: BuildStats,
}

/// Fills the fixed-width tables from cell records.
#[derive(Debug, Clone)]
pub struct AdjacencyBuilder<'a> {
    boundary_marker: &'a str,
}

impl<'a> AdjacencyBuilder<'a> {
    pub fn new(boundary_marker: &'a str) -> Self {
        Self { boundary_marker }
    }

    /// Run the second pass over the same records the [`crate::CellIndexer`] saw.
    pub fn build(
        &self,
        cells: &CellIds,
        super_cells: &SuperCellMap,
        records: &[Record],
    ) -> Result<Adjacency> {
        let n = cells.len();
        let mut out = Adjacency {
            connections: ConnectionTable::new(n),
            weights: WeightTable::new(n),
            directions: DirectionTable::new(n),
            attributes: AttributeTable::new(n),
            memberships: vec![None; n],
            stats: BuildStats::default(),
        };
        let mut slots_used = vec![0u8; n];

        for record in records {
            let hexid = index::hexid(record)?;
            let cell = cells.get(hexid).ok_or_else(|| Error::MalformedRecord {
                element: crate::xml::CELL_DATA_TAG.to_string(),
                field: index::HEXID_TAG.to_string(),
            })?;
            let used = self.place_record(cell, hexid, record, cells, super_cells, &mut out)?;
            slots_used[cell.as_usize()] = used;
        }

        out.stats.isolated = fill_weights(&mut out.weights, &slots_used);
        out.stats.links = slots_used.iter().map(|&u| u as usize).sum();

        tracing::debug!(
            links = out.stats.links,
            boundary_refs = out.stats.boundary_refs,
            unknown_refs = out.stats.unknown_refs,
            isolated = out.stats.isolated,
            "built adjacency"
        );
        Ok(out)
    }

    /// Place one record's fields. Returns the number of slots used.
    fn place_record(
        &self,
        cell: CellIndex,
        hexid: &str,
        record: &Record,
        cells: &CellIds,
        super_cells: &SuperCellMap,
        out: &mut Adjacency,
    ) -> Result<u8> {
        let i = cell.as_usize();
        let mut used = 0usize;

        for field in record.iter() {
            if let Some(dir) = Direction::from_tag(&field.tag) {
                if field.text == self.boundary_marker {
                    out.stats.boundary_refs += 1;
                    continue;
                }
                let Some(neighbour) = cells.get(&field.text) else {
                    out.stats.unknown_refs += 1;
                    tracing::trace!(cell = hexid, direction = %dir, neighbour = %field.text, "dropping unknown neighbour");
                    continue;
                };
                if used == DEGREE {
                    return Err(Error::SlotOverflow { cell: hexid.to_string() });
                }
                out.connections.row_mut(cell)[used] = neighbour.as_slot();
                out.directions.row_mut(cell)[used] = Some(dir);
                used += 1;
                continue;
            }

            match field.tag.as_str() {
                K_TAG => out.attributes.k[i] = index::parse_decimal(K_TAG, &field.text)?,
                SUPER_CELL_TAG => {
                    let group = super_cells.get(&field.text).ok_or_else(|| {
                        Error::UnknownGroupReference {
                            cell: hexid.to_string(),
                            group: field.text.clone(),
                        }
                    })?;
                    out.attributes.assign_super_cell(cell, group);
                    out.memberships[i] = Some(field.text.clone());
                }
                EASTING_TAG => {
                    out.attributes.easting[i] = index::parse_decimal(EASTING_TAG, &field.text)?
                }
                NORTHING_TAG => {
                    out.attributes.northing[i] = index::parse_decimal(NORTHING_TAG, &field.text)?
                }
                _ => {}
            }
        }

        Ok(used as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{CellIndexer, SuperCellIndexer};
    use crate::model::{NO_NEIGHBOUR, NO_WEIGHT};
    use pretty_assertions::assert_eq;

    fn cell(id: &str, fields: &[(&str, &str)]) -> Record {
        fields
            .iter()
            .fold(Record::new().with_field("HEXID", id), |r, (t, v)| r.with_field(*t, *v))
    }

    fn run(records: &[Record], groups: &[Record]) -> Result<Adjacency> {
        let super_cells = SuperCellIndexer::new(100.0).index(groups)?;
        let ids = CellIndexer::new().index(records)?;
        AdjacencyBuilder::new("b").build(&ids, &super_cells, records)
    }

    #[test]
    fn test_slots_fill_in_record_order() {
        let records = [
            cell("c", &[("N", "n"), ("NE", "b"), ("SE", "se"), ("S", "b"), ("SW", "b"), ("NW", "b")]),
            cell("n", &[]),
            cell("se", &[]),
        ];
        let adj = run(&records, &[]).unwrap();

        assert_eq!(adj.connections.rows()[0], [1, 2, -1, -1, -1, -1]);
        assert_eq!(adj.weights.rows()[0], [0.5, 1.0, -1.0, -1.0, -1.0, -1.0]);
        assert_eq!(adj.directions.row(CellIndex(0)).unwrap()[..2].to_vec(), vec![Some(Direction::N), Some(Direction::SE)]);
        assert_eq!(adj.stats.boundary_refs, 4);
        assert_eq!(adj.stats.isolated, 2);
    }

    #[test]
    fn test_slot_order_is_record_order_not_compass_order() {
        let records = [
            cell("c", &[("NW", "x"), ("N", "y")]),
            cell("x", &[]),
            cell("y", &[]),
        ];
        let adj = run(&records, &[]).unwrap();
        assert_eq!(adj.connections.rows()[0][..2].to_vec(), vec![1, 2]);
        assert_eq!(adj.directions.row(CellIndex(0)).unwrap()[0], Some(Direction::NW));
    }

    #[test]
    fn test_unknown_neighbour_is_skipped() {
        let records = [cell("c", &[("N", "ghost"), ("S", "d")]), cell("d", &[])];
        let adj = run(&records, &[]).unwrap();
        assert_eq!(adj.connections.rows()[0], [1, -1, -1, -1, -1, -1]);
        assert_eq!(adj.weights.rows()[0][0], 1.0);
        assert_eq!(adj.stats.unknown_refs, 1);
    }

    #[test]
    fn test_forward_references_resolve() {
        // "d" is defined after "c" refers to it.
        let records = [cell("c", &[("S", "d")]), cell("d", &[("N", "c")])];
        let adj = run(&records, &[]).unwrap();
        assert_eq!(adj.connections.rows()[0][0], 1);
        assert_eq!(adj.connections.rows()[1][0], 0);
        assert_eq!(adj.stats.links, 2);
    }

    #[test]
    fn test_attributes_and_super_cell() {
        let groups = [Record::new()
            .with_field("ID", "A")
            .with_field("InResistance", "50")
            .with_field("OutResistance", "25")];
        let records = [
            cell("c", &[("K", "0.3"), ("supercell", "A"), ("easting", "100.5"), ("northing", "-2")]),
            cell("d", &[("K", "1")]),
        ];
        let adj = run(&records, &groups).unwrap();

        assert_eq!(adj.attributes.k, vec![0.3, 1.0]);
        assert_eq!(adj.attributes.in_res, vec![0.5, 0.0]);
        assert_eq!(adj.attributes.out_res, vec![0.25, 0.0]);
        assert_eq!(adj.attributes.super_cell, vec![0, 0]);
        assert_eq!(adj.attributes.easting, vec![100.5, 0.0]);
        assert_eq!(adj.attributes.northing, vec![-2.0, 0.0]);
        assert_eq!(adj.memberships, vec![Some("A".to_string()), None]);
    }

    #[test]
    fn test_unknown_super_cell_fails() {
        let records = [cell("c", &[("supercell", "Z")])];
        let err = run(&records, &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownGroupReference { ref cell, ref group } if cell == "c" && group == "Z"
        ));
    }

    #[test]
    fn test_bad_k_fails() {
        let records = [cell("c", &[("K", "wet")])];
        assert!(matches!(run(&records, &[]), Err(Error::InvalidNumber { .. })));
    }

    #[test]
    fn test_seventh_neighbour_overflows() {
        let mut fields: Vec<(&str, &str)> = Direction::ALL.iter().map(|d| (d.tag(), "d")).collect();
        fields.push(("N", "d"));
        let records = [cell("c", &fields), cell("d", &[])];
        assert!(matches!(run(&records, &[]), Err(Error::SlotOverflow { .. })));
    }

    #[test]
    fn test_isolated_cell_rows_stay_sentinel() {
        let records = [cell("c", &[("N", "b"), ("S", "b")])];
        let adj = run(&records, &[]).unwrap();
        assert_eq!(adj.connections.rows()[0], [NO_NEIGHBOUR; DEGREE]);
        assert_eq!(adj.weights.rows()[0], [NO_WEIGHT; DEGREE]);
        assert_eq!(adj.stats.isolated, 1);
    }
}
