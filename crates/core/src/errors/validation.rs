//! Small validation helpers shared by the newtypes

use super::types::{Error, Result};
use std::fmt;

/// Functional validation utilities
pub struct Validate;

impl Validate {
    /// Validate that a string is not empty
    pub fn not_empty(value: &str, field_name: &str) -> Result<()> {
        if value.is_empty() {
            Err(Error::Configuration {
                message: format!("Field '{field_name}' cannot be empty"),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a number is within a range
    pub fn in_range<T>(value: T, min: T, max: T, field_name: &str) -> Result<T>
    where
        T: PartialOrd + fmt::Display + Copy,
    {
        if value < min || value > max {
            Err(Error::Configuration {
                message: format!(
                    "Field '{field_name}' value {value} is not in range [{min}, {max}]"
                ),
            })
        } else {
            Ok(value)
        }
    }
}
