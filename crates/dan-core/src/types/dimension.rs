//! World dimension identifiers.

use crate::error::DanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dimension the region was exported from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    #[default]
    Overworld,
    Nether,
    End,
}

impl Dimension {
    /// Wire id written after the format version
    pub fn id(self) -> u8 {
        match self {
            Dimension::Overworld => 0,
            Dimension::Nether => 1,
            Dimension::End => 2,
        }
    }

    /// Look up a dimension by wire id
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Dimension::Overworld),
            1 => Some(Dimension::Nether),
            2 => Some(Dimension::End),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Overworld => "overworld",
            Dimension::Nether => "nether",
            Dimension::End => "end",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = DanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overworld" | "normal" => Ok(Dimension::Overworld),
            "nether" | "the_nether" => Ok(Dimension::Nether),
            "end" | "the_end" => Ok(Dimension::End),
            _ => Err(DanError::invalid("dimension", s)),
        }
    }
}
