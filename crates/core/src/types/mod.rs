//! Core domain types for the `cellar` persistence layer.
//!
//! ## Organization
//!
//! - **`value`**: The dynamic [`Value`] tree every stored collection is made of
//! - **`instant`**: Millisecond-precision UTC instants
//! - **`graph`**: Arena representation for shared and self-referential values
//! - **`keys`**: Validated stored key names
//! - **`records`**: Record shapes and the well-known record sets
//! - **`tier`**: Storage tiers and per-key residency

pub mod graph;
pub mod instant;
pub mod keys;
pub mod records;
pub mod tier;
pub mod value;

// Re-export all public types for convenient access
pub use graph::*;
pub use instant::*;
pub use keys::*;
pub use records::*;
pub use tier::*;
pub use value::*;
