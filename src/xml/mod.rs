//! ORM XML documents.
//!
//! The reader owns nothing: text in, [`OrmDocument`] out. Records keep
//! their fields in document order because neighbour slot order is
//! derived from it.

mod reader;

pub use reader::{read_document, read_file};

use serde::{Deserialize, Serialize};

/// Root child holding one super-cell definition.
pub const SUPER_CELLS_TAG: &str = "SuperCells";

/// Root child holding one cell definition.
pub const CELL_DATA_TAG: &str = "AllCellData";

/// One child element of a record: tag plus trimmed, unescaped text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub tag: String,
    pub text: String,
}

impl Field {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self { tag: tag.into(), text: text.into() }
    }
}

/// A `SuperCells` or `AllCellData` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.fields.push(Field::new(tag, text));
        self
    }

    /// Text of the first field with this tag.
    pub fn first(&self, tag: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.tag == tag).map(|f| f.text.as_str())
    }

    /// Text of the last field with this tag.
    pub fn last(&self, tag: &str) -> Option<&str> {
        self.fields.iter().rev().find(|f| f.tag == tag).map(|f| f.text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }
}

/// Parsed ORM document: the two record kinds, each in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrmDocument {
    pub super_cells: Vec<Record>,
    pub cells: Vec<Record>,
}

impl OrmDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_super_cell(mut self, record: Record) -> Self {
        self.super_cells.push(record);
        self
    }

    pub fn with_cell(mut self, record: Record) -> Self {
        self.cells.push(record);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_and_last_field() {
        let rec = Record::new()
            .with_field("ID", "a")
            .with_field("K", "1")
            .with_field("ID", "b");
        assert_eq!(rec.first("ID"), Some("a"));
        assert_eq!(rec.last("ID"), Some("b"));
        assert_eq!(rec.first("missing"), None);
    }
}
