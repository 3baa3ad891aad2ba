//! Per-record validation of decoded collections
//!
//! A collection is an array of records. Records that fail their set's shape
//! check are dropped and counted; the rest of the collection is kept.

use cellar_core::{Error, RecordSet, Result, Value};

/// Records that passed validation and how many were dropped
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedCollection {
    pub records: Vec<Value>,
    pub dropped: usize,
}

impl ValidatedCollection {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<Value> {
        self.records
    }
}

/// Split a decoded collection into valid records and a drop count.
///
/// Only a value that is not an array at all is an error.
pub fn validate_collection(set: &RecordSet, value: Value) -> Result<ValidatedCollection> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(Error::decode(format!(
                "{} collection must be an array, found {}",
                set.name,
                other.type_name()
            )))
        }
    };

    let mut collection = ValidatedCollection {
        records: Vec::with_capacity(items.len()),
        dropped: 0,
    };
    for (index, record) in items.into_iter().enumerate() {
        match set.shape.check(&record) {
            Ok(()) => collection.records.push(record),
            Err(violation) => {
                collection.dropped += 1;
                tracing::warn!(
                    collection = set.name,
                    index,
                    %violation,
                    "dropping invalid record"
                );
            }
        }
    }
    Ok(collection)
}
