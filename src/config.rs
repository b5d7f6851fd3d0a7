//! Ingest configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Directional text meaning "edge of the grid, no neighbour".
pub const DEFAULT_BOUNDARY_MARKER: &str = "b";

/// Resistances are stored as percentages in ORM XML.
pub const DEFAULT_RESISTANCE_DIVISOR: f64 = 100.0;

/// How to find and interpret an ORM XML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Document to read. Required by [`crate::HexGraph::build`].
    pub path: Option<PathBuf>,
    pub boundary_marker: String,
    /// Raw `InResistance` / `OutResistance` values are divided by this.
    pub resistance_divisor: f64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            path: None,
            boundary_marker: DEFAULT_BOUNDARY_MARKER.to_string(),
            resistance_divisor: DEFAULT_RESISTANCE_DIVISOR,
        }
    }
}

impl IngestConfig {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_boundary_marker(mut self, marker: impl Into<String>) -> Self {
        self.boundary_marker = marker.into();
        self
    }

    pub fn with_resistance_divisor(mut self, divisor: f64) -> Self {
        self.resistance_divisor = divisor;
        self
    }

    /// Load from a JSON document. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.resistance_divisor.is_finite() || self.resistance_divisor == 0.0 {
            return Err(Error::Configuration(format!(
                "resistance divisor must be finite and non-zero, got {}",
                self.resistance_divisor
            )));
        }
        Ok(())
    }
}
