//! Dense indexing of super-cells and cells.
//!
//! Both indexers assign indices in record order. They differ on repeats:
//! a repeated super-cell `ID` overwrites, a repeated cell `HEXID` fails.

mod cells;
mod super_cells;

pub use cells::{CellIds, CellIndexer, HEXID_TAG};
pub(crate) use cells::hexid;
pub use super_cells::{SuperCellIndexer, ID_TAG, IN_RESISTANCE_TAG, OUT_RESISTANCE_TAG};

use crate::{Error, Result};

/// Parse decimal field text.
pub(crate) fn parse_decimal(field: &str, text: &str) -> Result<f64> {
    text.trim().parse::<f64>().map_err(|_| Error::InvalidNumber {
        field: field.to_string(),
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("K", "1.5").unwrap(), 1.5);
        assert_eq!(parse_decimal("K", " 42 ").unwrap(), 42.0);
        assert_eq!(parse_decimal("K", "-3e2").unwrap(), -300.0);
        assert!(matches!(
            parse_decimal("K", "abc"),
            Err(Error::InvalidNumber { field, .. }) if field == "K"
        ));
        assert!(parse_decimal("K", "").is_err());
    }
}
