//! # Graph Sink Trait
//!
//! This is THE contract between a built [`crate::HexGraph`] and whatever
//! hosts its tables (a topology store, a dataframe, a simulation).
//!
//! A sink receives, in this order:
//!
//! | Call | Payload | Shape |
//! |------|---------|-------|
//! | `accept_topology` | connections + weights | `(N, 6)` each, `-1` sentinel |
//! | `accept_attributes` | `K`, `in_res`, `out_res`, `super_cell`, `easting`, `northing` | `N` per column |
//!
//! ## Implementations
//!
//! | Sink | Module | Description |
//! |------|--------|-------------|
//! | `MemorySink` | `memory` | Keeps owned copies, for testing/embedding |

pub mod memory;

use crate::model::{AttributeTable, ConnectionTable, WeightTable};
use crate::Result;

pub use memory::MemorySink;

/// Receiver of a built graph's tables.
///
/// Tables are lent, never mutated; a sink that wants to keep them clones.
/// Sinks should return `Error::Sink` for payloads they cannot host.
pub trait GraphSink {
    /// Receive the neighbour and cumulative-weight tables.
    fn accept_topology(&mut self, connections: &ConnectionTable, weights: &WeightTable) -> Result<()>;

    /// Receive the per-cell attribute columns.
    fn accept_attributes(&mut self, attributes: &AttributeTable) -> Result<()>;
}
