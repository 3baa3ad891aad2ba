//! Record shapes and the well-known record sets
//!
//! The business layer owns the full schema of each record; storage only
//! checks that the fields it cannot do without are present and scalar, so that
//! one corrupt record can be dropped without discarding its collection.

use super::keys::StoredKey;
use super::value::Value;
use crate::constants::{
    CACHE_KEY, DEFAULT_MAX_LOG_ENTRIES, LOGS_KEY, PRESETS_KEY, TAGS_KEY, TASKS_KEY,
};
use std::fmt;

/// The required fields of one kind of record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    pub name: &'static str,
    pub required: &'static [&'static str],
}

/// Why a record failed its shape check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeViolation {
    NotAnObject { found: &'static str },
    MissingField { field: &'static str },
    NonScalarField { field: &'static str, found: &'static str },
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeViolation::NotAnObject { found } => write!(f, "expected an object, found {found}"),
            ShapeViolation::MissingField { field } => write!(f, "missing required field '{field}'"),
            ShapeViolation::NonScalarField { field, found } => {
                write!(f, "field '{field}' must be a scalar, found {found}")
            }
        }
    }
}

impl RecordShape {
    pub const fn new(name: &'static str, required: &'static [&'static str]) -> Self {
        Self { name, required }
    }

    /// Check that `record` is an object carrying every required field as a scalar
    pub fn check(&self, record: &Value) -> Result<(), ShapeViolation> {
        let fields = record.as_object().ok_or(ShapeViolation::NotAnObject {
            found: record.type_name(),
        })?;
        for &field in self.required {
            match fields.get(field) {
                None | Some(Value::Undefined) => {
                    return Err(ShapeViolation::MissingField { field })
                }
                Some(value) if value.is_container() => {
                    return Err(ShapeViolation::NonScalarField {
                        field,
                        found: value.type_name(),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn is_valid(&self, record: &Value) -> bool {
        self.check(record).is_ok()
    }
}

/// A stored key together with the shape of the records it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSet {
    pub name: &'static str,
    pub key: &'static str,
    pub shape: RecordShape,
    /// Oldest records are discarded beyond this length
    pub max_len: Option<usize>,
}

impl RecordSet {
    pub const TASKS: RecordSet = RecordSet {
        name: "tasks",
        key: TASKS_KEY,
        shape: RecordShape::new("task", &["id", "text", "isCompleted", "priority", "createdAt"]),
        max_len: None,
    };

    pub const LOGS: RecordSet = RecordSet {
        name: "logs",
        key: LOGS_KEY,
        shape: RecordShape::new("log", &["id", "level", "message", "timestamp"]),
        max_len: Some(DEFAULT_MAX_LOG_ENTRIES),
    };

    pub const TAGS: RecordSet = RecordSet {
        name: "tags",
        key: TAGS_KEY,
        shape: RecordShape::new("tag", &["id", "name", "color"]),
        max_len: None,
    };

    pub const PRESETS: RecordSet = RecordSet {
        name: "presets",
        key: PRESETS_KEY,
        shape: RecordShape::new("preset", &["id", "name"]),
        max_len: None,
    };

    pub const CACHE: RecordSet = RecordSet {
        name: "cache",
        key: CACHE_KEY,
        shape: RecordShape::new("cache entry", &["key", "expiresAt", "createdAt"]),
        max_len: None,
    };

    /// Every well-known record set
    pub const ALL: [RecordSet; 5] = [
        Self::TASKS,
        Self::LOGS,
        Self::TAGS,
        Self::PRESETS,
        Self::CACHE,
    ];

    /// Look up a well-known record set by name
    pub fn by_name(name: &str) -> Option<RecordSet> {
        Self::ALL.into_iter().find(|set| set.name == name)
    }

    pub fn stored_key(&self) -> StoredKey {
        StoredKey::new_unchecked(self.key)
    }

    /// Same set with a different length cap
    #[must_use]
    pub const fn with_max_len(mut self, max_len: Option<usize>) -> Self {
        self.max_len = max_len;
        self
    }
}
