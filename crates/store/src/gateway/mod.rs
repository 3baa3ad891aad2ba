//! Tiered persistence gateway
//!
//! The gateway is the only entry point the rest of an application uses. Every
//! write goes through the [`Envelope`] and is attempted in the primary tier
//! first. When the primary tier reports that it is out of capacity, the encoded
//! payload is written to the overflow tier and the primary tier keeps only
//! [`TIER_MARKER`] for that key. Reads follow the marker.
//!
//! A key is always in exactly one of three states ([`Residency`]):
//!
//! - `Absent`: nothing stored; reads return the empty collection
//! - `Tier1`: the primary tier holds the encoded value
//! - `Tier2`: the primary tier holds the marker and the overflow tier the payload
//!
//! Capacity errors never reach the caller. A failed overflow write is fatal and
//! leaves the key in its previous state.

mod collections;

use crate::backend::PrimaryStore;
use crate::config::StoreConfig;
use crate::envelope::Envelope;
use crate::error::StoreError;
use crate::overflow::OverflowStore;
use cellar_core::{
    Error, Graph, Residency, Result, ResultExt, StoredKey, Tier, Value, TIER_MARKER,
};
use tracing::{debug, info, warn};

/// Reads and writes whole values across the primary and overflow tiers
#[derive(Debug)]
pub struct StorageGateway<P, O> {
    primary: P,
    overflow: O,
    envelope: Envelope,
}

impl<P, O> StorageGateway<P, O>
where
    P: PrimaryStore,
    O: OverflowStore,
{
    /// Gateway with the default envelope threshold
    pub fn new(primary: P, overflow: O) -> Self {
        Self::with_envelope(primary, overflow, Envelope::default())
    }

    pub fn with_envelope(primary: P, overflow: O, envelope: Envelope) -> Self {
        Self {
            primary,
            overflow,
            envelope,
        }
    }

    pub fn with_config(primary: P, overflow: O, config: &StoreConfig) -> Self {
        Self::with_envelope(primary, overflow, config.envelope())
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn overflow(&self) -> &O {
        &self.overflow
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Replace the value stored under `key`
    #[tracing::instrument(level = "debug", skip_all, fields(key = %key))]
    pub async fn write(&self, key: &StoredKey, value: &Value) -> Result<()> {
        let encoded = self.envelope.encode(value)?;
        self.store(key, encoded).await
    }

    /// Replace the value stored under `key` with an encoded object graph.
    ///
    /// Ancestor references are stored as the circular marker, so reading the
    /// key back yields a tree rather than the original graph.
    #[tracing::instrument(level = "debug", skip_all, fields(key = %key))]
    pub async fn write_graph(&self, key: &StoredKey, graph: &Graph) -> Result<()> {
        let encoded = self.envelope.encode_graph(graph)?;
        self.store(key, encoded).await
    }

    async fn store(&self, key: &StoredKey, encoded: String) -> Result<()> {
        let previous = self.residency(key)?;

        let rejected = match self.primary.set(key, &encoded) {
            Ok(()) => {
                debug!(bytes = encoded.len(), "stored in primary tier");
                if previous == Residency::Tier2 {
                    info!("value moved back to the primary tier");
                    self.discard_overflow_payload(key).await;
                }
                return Ok(());
            }
            Err(err) if err.is_capacity() => err,
            Err(err) => return Err(primary_error(key, "set", err)),
        };

        debug!(%rejected, "primary tier is full, writing to the overflow tier");
        self.overflow
            .put(key, &encoded)
            .await
            .map_err(|e| Error::overflow_write(key.as_str(), e))?;

        // A key already in tier 2 keeps its marker; the payload was just replaced
        if previous != Residency::Tier2 {
            if let Err(err) = self.primary.set(key, TIER_MARKER) {
                self.discard_overflow_payload(key).await;
                return Err(primary_error(key, "set marker", err));
            }
            info!(bytes = encoded.len(), "value migrated to the overflow tier");
        }
        Ok(())
    }

    /// Read the value stored under `key`, or the empty collection if there is none
    #[tracing::instrument(level = "debug", skip_all, fields(key = %key))]
    pub async fn read(&self, key: &StoredKey) -> Result<Value> {
        let Some(raw) = self
            .primary
            .get(key)
            .map_err(|e| primary_error(key, "get", e))?
        else {
            return Ok(Value::empty_collection());
        };

        if raw != TIER_MARKER {
            return self.envelope.decode(&raw).with_key(key.as_str());
        }

        debug!("following marker to the overflow tier");
        let payload = self
            .overflow
            .get(key)
            .await
            .map_err(|e| overflow_error(key, "get", e))?
            .ok_or_else(|| Error::missing_overflow_payload(key.as_str()))?;
        self.envelope.decode(&payload).with_key(key.as_str())
    }

    /// Which tier currently holds the value for `key`
    pub fn residency(&self, key: &StoredKey) -> Result<Residency> {
        let raw = self
            .primary
            .get(key)
            .map_err(|e| primary_error(key, "get", e))?;
        Ok(match raw.as_deref() {
            None => Residency::Absent,
            Some(TIER_MARKER) => Residency::Tier2,
            Some(_) => Residency::Tier1,
        })
    }

    /// Remove `key` from both tiers; returns whether anything was stored.
    ///
    /// The primary entry goes first. A payload left behind by a failed
    /// overflow cleanup is unreachable and is replaced by the next migration.
    #[tracing::instrument(level = "debug", skip_all, fields(key = %key))]
    pub async fn remove(&self, key: &StoredKey) -> Result<bool> {
        let residency = self.residency(key)?;
        let removed = self
            .primary
            .remove(key)
            .map_err(|e| primary_error(key, "remove", e))?;
        if residency == Residency::Tier2 {
            self.discard_overflow_payload(key).await;
        }
        Ok(removed)
    }

    async fn discard_overflow_payload(&self, key: &StoredKey) {
        if let Err(err) = self.overflow.remove(key).await {
            warn!(%err, "failed to remove stale overflow payload");
        }
    }
}

fn primary_error(key: &StoredKey, operation: &'static str, err: StoreError) -> Error {
    Error::storage(Tier::Primary, key.as_str(), operation, err.to_string())
}

fn overflow_error(key: &StoredKey, operation: &'static str, err: StoreError) -> Error {
    Error::storage(Tier::Overflow, key.as_str(), operation, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryStore, StoreUsage};
    use crate::error::StoreResult;
    use crate::overflow::MemoryOverflowStore;
    use cellar_core::{DateInstant, MAX_NESTING_DEPTH};

    /// Primary store that refuses to hold the tier marker
    struct MarkerRejectingStore(MemoryStore);

    impl PrimaryStore for MarkerRejectingStore {
        fn get(&self, key: &StoredKey) -> StoreResult<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &StoredKey, value: &str) -> StoreResult<()> {
            if value == TIER_MARKER {
                return Err(StoreError::unavailable("marker rejected"));
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &StoredKey) -> StoreResult<bool> {
            self.0.remove(key)
        }

        fn usage(&self) -> StoreResult<StoreUsage> {
            self.0.usage()
        }
    }

    fn key(name: &str) -> StoredKey {
        StoredKey::new(name).unwrap()
    }

    fn gateway(quota: u64) -> StorageGateway<MemoryStore, MemoryOverflowStore> {
        StorageGateway::new(MemoryStore::with_quota(quota), MemoryOverflowStore::new())
    }

    /// Incompressible text, so the encoded size tracks the input length
    fn noise(len: u32) -> Value {
        Value::from(
            (0..len)
                .filter_map(|i| char::from_u32(0x4E00 + i))
                .collect::<String>(),
        )
    }

    #[tokio::test]
    async fn test_absent_key_reads_as_empty_collection() {
        let gateway = gateway(1024);
        assert_eq!(
            gateway.read(&key("tasks")).await.unwrap(),
            Value::empty_collection()
        );
        assert_eq!(gateway.residency(&key("tasks")).unwrap(), Residency::Absent);
    }

    #[tokio::test]
    async fn test_small_value_stays_in_primary_tier() {
        let gateway = gateway(1024);
        let value = Value::object([("a", Value::from(1)), ("b", Value::from("x"))]);
        gateway.write(&key("k"), &value).await.unwrap();

        assert_eq!(gateway.residency(&key("k")).unwrap(), Residency::Tier1);
        assert_eq!(gateway.read(&key("k")).await.unwrap(), value);
        assert!(gateway.overflow().is_empty().await);
    }

    #[tokio::test]
    async fn test_oversized_value_moves_to_overflow_tier() {
        let gateway = gateway(256);
        let value = noise(2000);
        gateway.write(&key("big"), &value).await.unwrap();

        assert_eq!(gateway.residency(&key("big")).unwrap(), Residency::Tier2);
        assert_eq!(
            gateway.primary().get(&key("big")).unwrap().as_deref(),
            Some(TIER_MARKER)
        );
        assert_eq!(gateway.read(&key("big")).await.unwrap(), value);
    }

    #[tokio::test]
    async fn test_overflow_write_failure_keeps_previous_value() {
        let gateway = gateway(256);
        let original = Value::from("original");
        gateway.write(&key("k"), &original).await.unwrap();

        gateway.overflow().set_fail_writes(true);
        let err = gateway.write(&key("k"), &noise(2000)).await.unwrap_err();
        assert!(matches!(err, Error::OverflowWrite { .. }));

        assert_eq!(gateway.residency(&key("k")).unwrap(), Residency::Tier1);
        assert_eq!(gateway.read(&key("k")).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_marker_failure_discards_new_payload() {
        let gateway = StorageGateway::new(
            MarkerRejectingStore(MemoryStore::with_quota(256)),
            MemoryOverflowStore::new(),
        );
        let original = Value::from("original");
        gateway.write(&key("k"), &original).await.unwrap();

        match gateway.write(&key("k"), &noise(2000)).await {
            Err(Error::Storage {
                tier: Tier::Primary,
                operation,
                ..
            }) => assert_eq!(operation, "set marker"),
            other => panic!("expected storage error, got {other:?}"),
        }
        assert_eq!(gateway.residency(&key("k")).unwrap(), Residency::Tier1);
        assert_eq!(gateway.read(&key("k")).await.unwrap(), original);
        assert!(!gateway.overflow().contains(&key("k")).await);
    }

    #[tokio::test]
    async fn test_too_deep_value_is_rejected_before_storing() {
        let gateway = gateway(1024);
        let original = Value::from("original");
        gateway.write(&key("deep"), &original).await.unwrap();

        let deep = (0..200).fold(Value::from(1), |inner, _| Value::Array(vec![inner]));
        let err = gateway.write(&key("deep"), &deep).await.unwrap_err();
        assert!(matches!(err, Error::Encode { .. }), "{err}");
        assert_eq!(gateway.read(&key("deep")).await.unwrap(), original);

        let nested = (0..MAX_NESTING_DEPTH).fold(Value::from(1), |inner, _| {
            Value::Array(vec![inner])
        });
        gateway.write(&key("deep"), &nested).await.unwrap();
        assert_eq!(gateway.read(&key("deep")).await.unwrap(), nested);
    }

    #[tokio::test]
    async fn test_promotion_discards_overflow_payload() {
        let gateway = gateway(256);
        gateway.write(&key("k"), &noise(2000)).await.unwrap();
        assert!(gateway.overflow().contains(&key("k")).await);

        gateway.write(&key("k"), &Value::from(1)).await.unwrap();
        assert_eq!(gateway.residency(&key("k")).unwrap(), Residency::Tier1);
        assert!(!gateway.overflow().contains(&key("k")).await);
    }

    #[tokio::test]
    async fn test_missing_overflow_payload() {
        let gateway = gateway(256);
        gateway.primary().set(&key("k"), TIER_MARKER).unwrap();
        assert!(matches!(
            gateway.read(&key("k")).await,
            Err(Error::MissingOverflowPayload { .. })
        ));
    }

    #[tokio::test]
    async fn test_corrupt_primary_value_is_a_keyed_decode_error() {
        let gateway = gateway(256);
        gateway.primary().set(&key("k"), "{not json").unwrap();
        match gateway.read(&key("k")).await {
            Err(Error::Decode { key: Some(k), .. }) => assert_eq!(k, "k"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remove_clears_both_tiers() {
        let gateway = gateway(256);
        gateway.write(&key("k"), &noise(2000)).await.unwrap();
        assert!(gateway.remove(&key("k")).await.unwrap());
        assert_eq!(gateway.residency(&key("k")).unwrap(), Residency::Absent);
        assert!(gateway.overflow().is_empty().await);
        assert!(!gateway.remove(&key("k")).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_succeeds_when_overflow_cleanup_fails() {
        let gateway = gateway(256);
        gateway.write(&key("k"), &noise(2000)).await.unwrap();

        gateway.overflow().set_fail_writes(true);
        assert!(gateway.remove(&key("k")).await.unwrap());
        assert_eq!(gateway.residency(&key("k")).unwrap(), Residency::Absent);
        assert_eq!(
            gateway.read(&key("k")).await.unwrap(),
            Value::empty_collection()
        );
    }

    #[tokio::test]
    async fn test_graph_write_reads_back_with_marker() {
        let gateway = gateway(1024);
        let mut graph = Graph::new();
        let obj = graph.object();
        let when = graph.add(&Value::Date(DateInstant::from_millis(0).unwrap()));
        graph.insert(obj, "when", when).unwrap();
        graph.insert(obj, "self", obj).unwrap();
        graph.set_root(obj).unwrap();

        gateway.write_graph(&key("g"), &graph).await.unwrap();
        let read = gateway.read(&key("g")).await.unwrap();
        assert_eq!(read.get("self"), Some(&Value::from("[Circular]")));
        assert!(read.get("when").and_then(Value::as_date).is_some());
    }
}
