//! Storage tiers and per-key residency

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two storage tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Size-constrained synchronous store
    Primary,
    /// Asynchronous store used only when the primary tier is full
    Overflow,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Primary => f.write_str("primary store"),
            Tier::Overflow => f.write_str("overflow store"),
        }
    }
}

/// Where the payload of a stored key currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Residency {
    Absent,
    Tier1,
    Tier2,
}

impl fmt::Display for Residency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Residency::Absent => f.write_str("absent"),
            Residency::Tier1 => f.write_str("tier1"),
            Residency::Tier2 => f.write_str("tier2"),
        }
    }
}
