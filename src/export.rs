//! Snapshot export — serialize a built graph.
//!
//! ```text
//! HexGraph → export_json() → JSON snapshot
//!   → snapshot_from_json() on the other side
//! HexGraph → attributes_to_record_batch() → Arrow RecordBatch   (arrow-results)
//! ```

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::build::BuildStats;
use crate::model::*;
use crate::{HexGraph, Result};

/// Format tag written into every snapshot.
pub const SNAPSHOT_FORMAT: &str = "orm-hexgraph/1";

/// One super-cell, by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperCellEntry {
    pub name: String,
    #[serde(flatten)]
    pub record: SuperCell,
}

/// Self-contained serializable view of a [`HexGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub format: String,
    /// `HEXID` of each row, in dense index order.
    pub hexids: Vec<String>,
    pub super_cells: Vec<SuperCellEntry>,
    pub connections: ConnectionTable,
    pub weights: WeightTable,
    pub directions: DirectionTable,
    pub attributes: AttributeTable,
    pub stats: BuildStats,
}

impl From<&HexGraph> for GraphSnapshot {
    fn from(graph: &HexGraph) -> Self {
        Self {
            format: SNAPSHOT_FORMAT.to_string(),
            hexids: graph.cell_ids().ids().to_vec(),
            super_cells: graph
                .super_cells()
                .iter()
                .map(|(name, record)| SuperCellEntry { name: name.to_string(), record: *record })
                .collect(),
            connections: graph.connections().clone(),
            weights: graph.weights().clone(),
            directions: graph.directions().clone(),
            attributes: graph.attributes().clone(),
            stats: *graph.stats(),
        }
    }
}

impl GraphSnapshot {
    pub fn cell_count(&self) -> usize {
        self.hexids.len()
    }
}

/// Write a graph as a pretty-printed JSON snapshot.
pub fn export_json(graph: &HexGraph, writer: &mut dyn Write) -> Result<()> {
    let snapshot = GraphSnapshot::from(graph);
    serde_json::to_writer_pretty(&mut *writer, &snapshot)?;
    writeln!(writer)?;
    tracing::debug!(cells = snapshot.cell_count(), "exported JSON snapshot");
    Ok(())
}

/// Read a snapshot written by [`export_json`].
pub fn snapshot_from_json(reader: &mut dyn Read) -> Result<GraphSnapshot> {
    Ok(serde_json::from_reader(reader)?)
}

// ============================================================================
// Arrow
// ============================================================================

/// The attribute table as an Arrow batch: `hexid` followed by the six
/// attribute columns, one row per cell.
#[cfg(feature = "arrow-results")]
pub fn attributes_to_record_batch(graph: &HexGraph) -> Result<arrow_array::RecordBatch> {
    use std::sync::Arc;

    use arrow_array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
    use arrow_schema::{DataType, Field, Schema};

    let attrs = graph.attributes();
    let mut fields = vec![Field::new("hexid", DataType::Utf8, false)];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(
        graph.cell_ids().ids().to_vec(),
    ))];

    for column in Column::ALL {
        match attrs.column(column) {
            ColumnData::Float(values) => {
                fields.push(Field::new(column.name(), DataType::Float64, false));
                columns.push(Arc::new(Float64Array::from(values.to_vec())));
            }
            ColumnData::Int(values) => {
                fields.push(Field::new(column.name(), DataType::Int64, false));
                columns.push(Arc::new(Int64Array::from(values.to_vec())));
            }
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .map_err(|e| crate::Error::Arrow(format!("failed to create RecordBatch: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IngestConfig;

    const GRID: &str = r#"<ORM>
        <SuperCells><ID>A</ID><InResistance>50</InResistance><OutResistance>25</OutResistance></SuperCells>
        <AllCellData><HEXID>h0</HEXID><N>h1</N><K>2</K><supercell>A</supercell></AllCellData>
        <AllCellData><HEXID>h1</HEXID><S>h0</S><NE>b</NE></AllCellData>
    </ORM>"#;

    #[test]
    fn test_snapshot_reads_back() {
        let graph = HexGraph::from_xml_str(GRID, &IngestConfig::default()).unwrap();
        let mut buf = Vec::new();
        export_json(&graph, &mut buf).unwrap();

        let snapshot = snapshot_from_json(&mut buf.as_slice()).unwrap();
        assert_eq!(snapshot, GraphSnapshot::from(&graph));
        assert_eq!(snapshot.format, SNAPSHOT_FORMAT);
        assert_eq!(snapshot.hexids, vec!["h0", "h1"]);
        assert_eq!(snapshot.super_cells[0].name, "A");
    }

    #[test]
    fn test_json_uses_column_names() {
        let graph = HexGraph::from_xml_str(GRID, &IngestConfig::default()).unwrap();
        let mut buf = Vec::new();
        export_json(&graph, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        let attrs = &value["attributes"];
        for column in Column::ALL {
            assert!(attrs.get(column.name()).is_some(), "missing column {column}");
        }
        assert_eq!(value["super_cells"][0]["in_resistance"], serde_json::json!(0.5));
    }

    #[cfg(feature = "arrow-results")]
    #[test]
    fn test_record_batch_columns() {
        let graph = HexGraph::from_xml_str(GRID, &IngestConfig::default()).unwrap();
        let batch = attributes_to_record_batch(&graph).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 7);
        assert!(batch.column_by_name("super_cell").is_some());
    }
}
