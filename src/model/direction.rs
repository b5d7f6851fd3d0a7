//! Compass directions of a hexagonal cell.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of neighbour slots per cell.
pub const DEGREE: usize = 6;

/// One of the six neighbour directions of a flat-sided hex cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    NE,
    SE,
    S,
    SW,
    NW,
}

impl Direction {
    pub const ALL: [Direction; DEGREE] = [
        Direction::N,
        Direction::NE,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::NW,
    ];

    /// The XML tag naming this direction.
    pub fn tag(self) -> &'static str {
        match self {
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::NW => "NW",
        }
    }

    /// Match an XML field tag. Case-sensitive, like the rest of the format.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "N" => Some(Direction::N),
            "NE" => Some(Direction::NE),
            "SE" => Some(Direction::SE),
            "S" => Some(Direction::S),
            "SW" => Some(Direction::SW),
            "NW" => Some(Direction::NW),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::N => Direction::S,
            Direction::NE => Direction::SW,
            Direction::SE => Direction::NW,
            Direction::S => Direction::N,
            Direction::SW => Direction::NE,
            Direction::NW => Direction::SE,
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("not a hex direction: {s}"))
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
