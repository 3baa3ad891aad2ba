//! Error types and result extensions for cellar operations

mod builders;
mod conversions;
mod extensions;
mod types;
mod validation;

pub use builders::*;
pub use extensions::*;
pub use types::{Error, Result};
pub use validation::Validate;
