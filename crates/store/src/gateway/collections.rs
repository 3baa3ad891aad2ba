//! Whole-collection helpers on top of the gateway

use super::StorageGateway;
use crate::backend::PrimaryStore;
use crate::overflow::OverflowStore;
use crate::validation::{validate_collection, ValidatedCollection};
use cellar_core::{RecordSet, Result, ResultExt, Value};

impl<P, O> StorageGateway<P, O>
where
    P: PrimaryStore,
    O: OverflowStore,
{
    /// Read a record set, dropping records that fail its shape check
    pub async fn read_collection(&self, set: &RecordSet) -> Result<ValidatedCollection> {
        let key = set.stored_key();
        let value = self.read(&key).await?;
        validate_collection(set, value).with_key(key.as_str())
    }

    /// Replace a record set; beyond `max_len` the oldest records are discarded
    pub async fn write_collection(&self, set: &RecordSet, mut records: Vec<Value>) -> Result<()> {
        if let Some(max_len) = set.max_len {
            if records.len() > max_len {
                let excess = records.len() - max_len;
                records.drain(..excess);
                tracing::debug!(collection = set.name, excess, "trimmed oldest records");
            }
        }
        self.write(&set.stored_key(), &Value::Array(records)).await
    }

    /// Append one record to a record set
    pub async fn append(&self, set: &RecordSet, record: Value) -> Result<()> {
        let mut records = self.read_collection(set).await?.into_records();
        records.push(record);
        self.write_collection(set, records).await
    }
}
