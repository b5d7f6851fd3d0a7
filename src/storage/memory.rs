//! In-memory graph sink.
//!
//! This is the reference implementation of `GraphSink`.
//! It checks the shape contract and keeps owned copies of every table.
//!
//! ## Limitations
//!
//! - **One graph per sink**: a second `accept_topology()` replaces the
//!   first and clears any attributes received for it.

use crate::model::{AttributeTable, ConnectionTable, WeightTable};
use crate::{Error, Result};
use super::GraphSink;

/// Sink that stores the tables it is handed.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    connections: Option<ConnectionTable>,
    weights: Option<WeightTable>,
    attributes: Option<AttributeTable>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connections(&self) -> Option<&ConnectionTable> {
        self.connections.as_ref()
    }

    pub fn weights(&self) -> Option<&WeightTable> {
        self.weights.as_ref()
    }

    pub fn attributes(&self) -> Option<&AttributeTable> {
        self.attributes.as_ref()
    }

    /// Number of cells in the accepted topology.
    pub fn cell_count(&self) -> Option<usize> {
        self.connections.as_ref().map(ConnectionTable::len)
    }

    /// True once both topology and attributes have been accepted.
    pub fn is_complete(&self) -> bool {
        self.connections.is_some() && self.attributes.is_some()
    }
}

impl GraphSink for MemorySink {
    fn accept_topology(&mut self, connections: &ConnectionTable, weights: &WeightTable) -> Result<()> {
        if connections.shape() != weights.shape() {
            return Err(Error::Sink(format!(
                "connection table {:?} and weight table {:?} differ in shape",
                connections.shape(),
                weights.shape()
            )));
        }
        self.connections = Some(connections.clone());
        self.weights = Some(weights.clone());
        self.attributes = None;
        Ok(())
    }

    fn accept_attributes(&mut self, attributes: &AttributeTable) -> Result<()> {
        let Some(expected) = self.cell_count() else {
            return Err(Error::Sink("attributes received before topology".into()));
        };
        if !attributes.is_aligned() || attributes.len() != expected {
            return Err(Error::Sink(format!(
                "attribute columns must all have {expected} rows"
            )));
        }
        self.attributes = Some(attributes.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_matching_tables() {
        let mut sink = MemorySink::new();
        sink.accept_topology(&ConnectionTable::new(3), &WeightTable::new(3)).unwrap();
        sink.accept_attributes(&AttributeTable::new(3)).unwrap();
        assert!(sink.is_complete());
        assert_eq!(sink.cell_count(), Some(3));
    }

    #[test]
    fn test_rejects_shape_mismatch() {
        let mut sink = MemorySink::new();
        assert!(matches!(
            sink.accept_topology(&ConnectionTable::new(3), &WeightTable::new(2)),
            Err(Error::Sink(_))
        ));
        sink.accept_topology(&ConnectionTable::new(3), &WeightTable::new(3)).unwrap();
        assert!(matches!(
            sink.accept_attributes(&AttributeTable::new(4)),
            Err(Error::Sink(_))
        ));
        assert!(!sink.is_complete());
    }

    #[test]
    fn test_attributes_need_topology_first() {
        let mut sink = MemorySink::new();
        assert!(sink.accept_attributes(&AttributeTable::new(0)).is_err());
    }

    #[test]
    fn test_new_topology_clears_attributes() {
        let mut sink = MemorySink::new();
        sink.accept_topology(&ConnectionTable::new(1), &WeightTable::new(1)).unwrap();
        sink.accept_attributes(&AttributeTable::new(1)).unwrap();
        sink.accept_topology(&ConnectionTable::new(2), &WeightTable::new(2)).unwrap();
        assert!(sink.attributes().is_none());
    }
}
