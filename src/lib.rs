//! # orm-hexgraph — Hexagonal Cell Graphs from ORM XML
//!
//! Reads an ORM XML grid description (cells, directional neighbours,
//! per-cell attributes, super-cell groups) and builds one immutable,
//! densely indexed graph for neighbour sampling.
//!
//! ## Design Principles
//!
//! 1. **Reader owns nothing**: XML → [`OrmDocument`] is a pure function
//! 2. **Two passes, owned maps**: cells are indexed first, then resolved
//! 3. **Fixed width**: every table is `(cell_count, 6)` with a `-1` sentinel
//! 4. **Sink-agnostic**: tables are handed to any [`GraphSink`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orm_hexgraph::{HexGraph, IngestConfig};
//!
//! # fn example() -> orm_hexgraph::Result<()> {
//! let config = IngestConfig::default().with_path("grid.xml");
//! let graph = HexGraph::build(&config)?;
//!
//! for name in graph.super_cell_names() {
//!     let mask = graph.get_super_cell(name)?;
//!     println!("{name}: {} cells", mask.iter().filter(|&&m| m).count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Read | `xml` | `OrmDocument` |
//! | Index super-cells | `index` | `SuperCellMap` |
//! | Index cells | `index` | `CellIds` |
//! | Build | `build` | connection, weight, attribute tables |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod xml;
pub mod index;
pub mod build;
pub mod storage;
pub mod config;
pub mod export;

use std::path::Path;

use smallvec::SmallVec;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{
    Cell, CellIndex, Direction, SuperCell, SuperCellMap,
    ConnectionTable, WeightTable, DirectionTable, AttributeTable, Column,
    DEGREE, NO_NEIGHBOUR, NO_WEIGHT,
};
pub use xml::{OrmDocument, Record, Field};
pub use index::{CellIds, CellIndexer, SuperCellIndexer};
pub use build::{AdjacencyBuilder, Adjacency, BuildStats};
pub use storage::{GraphSink, MemorySink};
pub use config::IngestConfig;
pub use export::GraphSnapshot;

// ============================================================================
// Top-level graph handle
// ============================================================================

/// An immutable hex-grid graph snapshot.
///
/// Row `i` of every table belongs to the cell with dense index `i`.
#[derive(Debug, Clone)]
pub struct HexGraph {
    cell_ids: CellIds,
    super_cells: SuperCellMap,
    adjacency: Adjacency,
}

impl HexGraph {
    /// Read the document at `config.path` and build the graph.
    pub fn build(config: &IngestConfig) -> Result<Self> {
        let path = config.path.as_deref().ok_or_else(|| {
            Error::Configuration("a path to an ORM XML document must be provided".into())
        })?;
        Self::from_path(path, config)
    }

    /// Read the document at `path`, ignoring `config.path`.
    pub fn from_path(path: &Path, config: &IngestConfig) -> Result<Self> {
        config.validate()?;
        let doc = xml::read_file(path)?;
        Self::run(&doc, config)
    }

    /// Build from XML text. `config.path` is ignored.
    pub fn from_xml_str(text: &str, config: &IngestConfig) -> Result<Self> {
        config.validate()?;
        let doc = xml::read_document(text)?;
        Self::run(&doc, config)
    }

    /// Build from an already parsed document.
    pub fn from_document(doc: &OrmDocument, config: &IngestConfig) -> Result<Self> {
        config.validate()?;
        Self::run(doc, config)
    }

    fn run(doc: &OrmDocument, config: &IngestConfig) -> Result<Self> {
        // Phase 1: super-cells
        let super_cells = SuperCellIndexer::new(config.resistance_divisor)
            .index(&doc.super_cells)?;

        // Phase 2: cell ids → dense indices
        let cell_ids = CellIndexer::new().index(&doc.cells)?;

        // Phase 3: neighbour slots, attributes, weights
        let adjacency = AdjacencyBuilder::new(&config.boundary_marker)
            .build(&cell_ids, &super_cells, &doc.cells)?;

        tracing::info!(
            cells = cell_ids.len(),
            super_cells = super_cells.len(),
            links = adjacency.stats.links,
            isolated = adjacency.stats.isolated,
            "built hex graph"
        );

        Ok(Self { cell_ids, super_cells, adjacency })
    }

    // ========================================================================
    // Tables
    // ========================================================================

    pub fn cell_count(&self) -> usize {
        self.cell_ids.len()
    }

    pub fn connections(&self) -> &ConnectionTable {
        &self.adjacency.connections
    }

    pub fn weights(&self) -> &WeightTable {
        &self.adjacency.weights
    }

    pub fn directions(&self) -> &DirectionTable {
        &self.adjacency.directions
    }

    pub fn attributes(&self) -> &AttributeTable {
        &self.adjacency.attributes
    }

    pub fn super_cells(&self) -> &SuperCellMap {
        &self.super_cells
    }

    pub fn cell_ids(&self) -> &CellIds {
        &self.cell_ids
    }

    pub fn stats(&self) -> &BuildStats {
        &self.adjacency.stats
    }

    // ========================================================================
    // Cells
    // ========================================================================

    pub fn index_of(&self, hexid: &str) -> Option<CellIndex> {
        self.cell_ids.get(hexid)
    }

    pub fn hexid(&self, cell: CellIndex) -> Option<&str> {
        self.cell_ids.hexid(cell)
    }

    pub fn neighbours(&self, cell: CellIndex) -> SmallVec<[CellIndex; DEGREE]> {
        self.adjacency.connections.neighbours(cell)
    }

    pub fn degree(&self, cell: CellIndex) -> usize {
        self.adjacency.connections.degree(cell)
    }

    /// Assemble the row view of one cell.
    pub fn cell(&self, cell: CellIndex) -> Option<Cell> {
        let hexid = self.cell_ids.hexid(cell)?;
        let attrs = &self.adjacency.attributes;
        let i = cell.as_usize();
        let super_cell = self.adjacency.memberships[i]
            .as_deref()
            .and_then(|name| self.super_cells.get(name))
            .copied();
        Some(Cell {
            index: cell,
            hexid: hexid.to_string(),
            k: attrs.k[i],
            easting: attrs.easting[i],
            northing: attrs.northing[i],
            super_cell,
            neighbours: self.neighbours(cell).into_vec(),
        })
    }

    // ========================================================================
    // Super-cell queries
    // ========================================================================

    /// Mask of cells whose `super_cell` attribute equals the named group's index.
    ///
    /// Cells outside every group carry the default index 0 and therefore
    /// match the group whose index is 0.
    pub fn get_super_cell(&self, name: &str) -> Result<Vec<bool>> {
        let group = self
            .super_cells
            .get(name)
            .ok_or_else(|| Error::UnknownSuperCell(name.to_string()))?;
        Ok(self
            .adjacency
            .attributes
            .super_cell
            .iter()
            .map(|&s| s == group.index)
            .collect())
    }

    /// Super-cell names, in the order they were first defined.
    pub fn super_cell_names(&self) -> Vec<&str> {
        self.super_cells.names().collect()
    }

    // ========================================================================
    // Hand-off
    // ========================================================================

    /// Hand the topology and attribute tables to a sink.
    pub fn publish<S: GraphSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.accept_topology(&self.adjacency.connections, &self.adjacency.weights)?;
        sink.accept_attributes(&self.adjacency.attributes)
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Build and query failures.
///
/// Every build failure is fatal: no graph is produced. Two input quirks are
/// deliberately *not* errors: neighbour references that are unknown or
/// boundary-marked are dropped, and a repeated super-cell `ID` overwrites
/// the earlier record (unlike a repeated cell `HEXID`, which fails).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Duplicate identifier: cell {id} is defined two times")]
    DuplicateIdentifier { id: String },

    #[error("Unknown group reference: cell {cell} references super-cell {group}")]
    UnknownGroupReference { cell: String, group: String },

    #[error("Unknown super-cell: {0}")]
    UnknownSuperCell(String),

    #[error("Malformed record: <{element}> is missing <{field}>")]
    MalformedRecord { element: String, field: String },

    #[error("Invalid number in <{field}>: {text:?}")]
    InvalidNumber { field: String, text: String },

    #[error("Slot overflow: cell {cell} has more than 6 neighbours")]
    SlotOverflow { cell: String },

    #[error("Capacity error: {0} cells do not fit the connection table encoding")]
    Capacity(usize),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Sink error: {0}")]
    Sink(String),

    #[cfg(feature = "arrow-results")]
    #[error("Arrow error: {0}")]
    Arrow(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
