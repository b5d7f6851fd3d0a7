//! Cumulative weight rows.

use crate::model::{cumulative_weights, CellIndex, WeightTable};

/// Write the weight row of every cell from its populated slot count.
///
/// Rows of cells with zero slots stay at the sentinel. Returns the number
/// of such isolated cells.
pub fn fill_weights(weights: &mut WeightTable, slots_used: &[u8]) -> usize {
    let mut isolated = 0;
    for (i, &used) in slots_used.iter().enumerate() {
        if used == 0 {
            isolated += 1;
            continue;
        }
        weights.set_row(CellIndex(i as u32), cumulative_weights(used as usize));
    }
    isolated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NO_WEIGHT;

    #[test]
    fn test_fill_weights() {
        let mut table = WeightTable::new(3);
        let isolated = fill_weights(&mut table, &[3, 0, 1]);
        assert_eq!(isolated, 1);
        assert_eq!(table.rows()[1], [NO_WEIGHT; 6]);
        assert_eq!(table.rows()[2][0], 1.0);
        let row = table.rows()[0];
        assert!((row[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((row[1] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(row[2], 1.0);
        assert_eq!(row[3], NO_WEIGHT);
    }
}
