//! Cell indexing: external `HEXID` → dense [`CellIndex`].

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::model::CellIndex;
use crate::xml::{Record, CELL_DATA_TAG};
use crate::{Error, Result};

pub const HEXID_TAG: &str = "HEXID";

/// Bidirectional id ↔ index table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellIds {
    by_id: HashMap<String, CellIndex>,
    ids: Vec<String>,
}

impl CellIds {
    /// Number of distinct cells, the row count of every table.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, hexid: &str) -> Option<CellIndex> {
        self.by_id.get(hexid).copied()
    }

    pub fn hexid(&self, cell: CellIndex) -> Option<&str> {
        self.ids.get(cell.as_usize()).map(String::as_str)
    }

    /// Ids in index order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

/// First pass over `AllCellData` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellIndexer;

impl CellIndexer {
    pub fn new() -> Self {
        Self
    }

    /// Assign indices in record order, failing on the first repeated id.
    pub fn index(&self, records: &[Record]) -> Result<CellIds> {
        if records.len() > i32::MAX as usize {
            return Err(Error::Capacity(records.len()));
        }

        let mut ids = CellIds {
            by_id: HashMap::with_capacity(records.len()),
            ids: Vec::with_capacity(records.len()),
        };
        for record in records {
            let hexid = hexid(record)?;
            if ids.by_id.contains_key(hexid) {
                return Err(Error::DuplicateIdentifier { id: hexid.to_string() });
            }
            let index = CellIndex(ids.ids.len() as u32);
            ids.by_id.insert(hexid.to_string(), index);
            ids.ids.push(hexid.to_string());
        }
        tracing::debug!(cells = ids.len(), "indexed cells");
        Ok(ids)
    }
}

/// The record's `HEXID`; the first one if repeated.
pub(crate) fn hexid(record: &Record) -> Result<&str> {
    match record.first(HEXID_TAG) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(Error::MalformedRecord {
            element: CELL_DATA_TAG.to_string(),
            field: HEXID_TAG.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(id: &str) -> Record {
        Record::new().with_field(HEXID_TAG, id)
    }

    #[test]
    fn test_first_seen_order() {
        let ids = CellIndexer::new().index(&[cell("z"), cell("a"), cell("m")]).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.get("z"), Some(CellIndex(0)));
        assert_eq!(ids.get("a"), Some(CellIndex(1)));
        assert_eq!(ids.get("m"), Some(CellIndex(2)));
        assert_eq!(ids.hexid(CellIndex(1)), Some("a"));
        assert_eq!(ids.hexid(CellIndex(3)), None);
    }

    #[test]
    fn test_duplicate_fails() {
        let err = CellIndexer::new()
            .index(&[cell("a"), cell("b"), cell("a")])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateIdentifier { ref id } if id == "a"));
    }

    #[test]
    fn test_missing_or_empty_hexid() {
        let no_id = Record::new().with_field("K", "1");
        assert!(matches!(
            CellIndexer::new().index(&[no_id]),
            Err(Error::MalformedRecord { .. })
        ));
        assert!(matches!(
            CellIndexer::new().index(&[cell("")]),
            Err(Error::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let ids = CellIndexer::new().index(&[]).unwrap();
        assert!(ids.is_empty());
    }
}
