//! Validated stored key names

use crate::errors::{Error, Result, Validate};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::ops::Deref;
use std::str::FromStr;

const MAX_KEY_LEN: usize = 128;

/// The name under which one whole collection is persisted.
///
/// Keys double as file names for the on-disk stores, so they are limited to
/// ASCII alphanumerics, `_`, `-` and `.`, and may not start with a dot. They
/// are stored lowercased, so `Tasks` and `tasks` name the same collection on
/// case-sensitive and case-insensitive file systems alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoredKey(String);

impl StoredKey {
    /// Create a new StoredKey with validation, lowercasing ASCII letters
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let mut key = key.into();
        Validate::not_empty(&key, "stored_key").map_err(|_| Error::invalid_key(&key, "empty"))?;
        if key.len() > MAX_KEY_LEN {
            return Err(Error::invalid_key(
                &key,
                format!("longer than {MAX_KEY_LEN} characters"),
            ));
        }
        if key.starts_with('.') {
            return Err(Error::invalid_key(&key, "must not start with '.'"));
        }
        if let Some(bad) = key
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            return Err(Error::invalid_key(
                &key,
                format!("character {bad:?} is not allowed"),
            ));
        }
        key.make_ascii_lowercase();
        Ok(Self(key))
    }

    /// Create a StoredKey without validation (use only for lowercase compile-time constants)
    pub fn new_unchecked(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StoredKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for StoredKey {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for StoredKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for StoredKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for StoredKey {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for StoredKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<StoredKey> for String {
    fn from(key: StoredKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        for key in ["tasks", "cellar_tasks_v3", "a.b-c_d", "X1"] {
            assert!(StoredKey::new(key).is_ok(), "{key} should be valid");
        }
    }

    #[test]
    fn test_invalid_keys() {
        for key in ["", ".hidden", "a/b", "../etc", "with space", "ключ"] {
            assert!(StoredKey::new(key).is_err(), "{key:?} should be invalid");
        }
        assert!(StoredKey::new("k".repeat(MAX_KEY_LEN + 1)).is_err());
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let upper = StoredKey::new("Cellar_Tasks_V3").unwrap();
        assert_eq!(upper.as_str(), "cellar_tasks_v3");
        assert_eq!(upper, StoredKey::new("cellar_tasks_v3").unwrap());

        let key: StoredKey = serde_json::from_str("\"TASKS\"").unwrap();
        assert_eq!(key.as_str(), "tasks");
    }

    #[test]
    fn test_serde_validates() {
        let key: StoredKey = serde_json::from_str("\"tasks\"").unwrap();
        assert_eq!(key.as_str(), "tasks");
        assert!(serde_json::from_str::<StoredKey>("\"a/b\"").is_err());
    }
}
