//! Core value model, record shapes, errors and constants for `cellar`.
//!
//! Everything the storage layer persists flows through the types defined here.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing every failure the persistence core can surface.
//! - **`types`**: The dynamic [`Value`] tree, the [`Graph`] arena for shared and
//!   cyclic structures, millisecond [`DateInstant`]s, validated [`StoredKey`]s and
//!   the [`RecordShape`]/[`RecordSet`] descriptors used to validate collections.
//! - **`constants`**: Reserved markers and default limits shared by every crate.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
    types::*,
};
