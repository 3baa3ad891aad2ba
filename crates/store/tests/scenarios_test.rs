//! End-to-end behaviour of the codec, the encoder and the gateway together

use cellar_core::{DateInstant, Graph, StoredKey, Value, CIRCULAR_MARKER, TIER_MARKER};
use cellar_store::{
    codec, serialization, Envelope, MemoryOverflowStore, MemoryStore, PrimaryStore,
    StorageGateway,
};
use proptest::prelude::*;

#[test]
fn test_plain_object_roundtrip() {
    let value = Value::object([("a", Value::from(1)), ("b", Value::from("x"))]);
    let text = serialization::encode(&value).unwrap();
    assert_eq!(serialization::decode(&text).unwrap(), value);
}

#[test]
fn test_date_roundtrip() {
    let instant = DateInstant::parse_iso("2025-01-01T12:00:00.000Z").unwrap();
    let value = Value::object([("d", Value::Date(instant))]);
    let decoded = serialization::decode(&serialization::encode(&value).unwrap()).unwrap();
    assert_eq!(decoded.get("d").and_then(Value::as_date), Some(&instant));
}

#[test]
fn test_empty_compression() {
    assert!(codec::compress("").is_empty());
    assert_eq!(codec::decompress(&[]).unwrap(), "");
}

#[test]
fn test_repetitive_text_compresses() {
    let input = format!("{}{}", "A".repeat(1000), "B".repeat(1000));
    assert!(codec::compress_text(&input).chars().count() < 2000);
}

#[tokio::test]
async fn test_value_larger_than_capacity_reads_back() {
    let gateway = StorageGateway::new(MemoryStore::with_quota(64), MemoryOverflowStore::new());
    let key = StoredKey::new("presets").unwrap();
    let value: Value = (0..50)
        .map(|i| {
            Value::object([
                ("id", Value::from(format!("preset-{i}"))),
                ("name", Value::from(format!("Preset {i}"))),
            ])
        })
        .collect();

    gateway.write(&key, &value).await.unwrap();
    assert_eq!(gateway.read(&key).await.unwrap(), value);
    assert_eq!(
        gateway.primary().get(&key).unwrap().as_deref(),
        Some(TIER_MARKER)
    );
}

#[test]
fn test_self_reference_decodes_to_marker() {
    let mut graph = Graph::new();
    let obj = graph.object();
    graph.insert(obj, "a", obj).unwrap();
    graph.set_root(obj).unwrap();

    let envelope = Envelope::default();
    let stored = envelope.encode_graph(&graph).unwrap();
    let decoded = envelope.decode(&stored).unwrap();
    assert_eq!(decoded, Value::object([("a", Value::from(CIRCULAR_MARKER))]));
}

#[test]
fn test_order_is_preserved() {
    let value = Value::object([
        ("zeta", Value::from(1)),
        ("alpha", Value::from(2)),
        ("mid", Value::Array(vec![Value::from(3), Value::from(1), Value::from(2)])),
    ]);
    let envelope = Envelope::new(0);
    let decoded = envelope.decode(&envelope.encode(&value).unwrap()).unwrap();
    let keys: Vec<_> = decoded.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
    assert_eq!(decoded, value);
}

proptest! {
    #[test]
    fn prop_threshold_is_exact(len in 2usize..600) {
        let envelope = Envelope::default();
        let value = Value::from("y".repeat(len - 2));
        let stored = envelope.encode(&value).unwrap();
        prop_assert_eq!(Envelope::is_compressed(&stored), len > envelope.threshold());
        prop_assert_eq!(envelope.decode(&stored).unwrap(), value);
    }
}
