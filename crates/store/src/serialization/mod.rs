//! Safe encoding and type-reviving decoding of values
//!
//! The encoder never fails on cyclic input: cycles can only be expressed
//! through a [`cellar_core::Graph`], and any container already open on the
//! current traversal path is written as [`cellar_core::CIRCULAR_MARKER`]. Date
//! instants are written as `{"__type":"Date","iso":"..."}` stamps which the
//! decoder turns back into [`cellar_core::Value::Date`].

mod encoder;
mod reviver;

pub use encoder::{encode, encode_graph, graph_to_stamped_json, to_stamped_json};
pub use reviver::{decode, revive};

#[cfg(test)]
mod tests {
    use super::*;
    use cellar_core::{DateInstant, Value};
    use proptest::prelude::*;

    fn arb_instant() -> impl Strategy<Value = DateInstant> {
        // years 1970..2200
        (0i64..7_258_118_400_000).prop_map(|ms| DateInstant::from_millis(ms).unwrap())
    }

    fn arb_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            any::<u64>().prop_map(Value::from),
            (-1.0e12f64..1.0e12).prop_map(Value::from),
            ".{0,24}".prop_map(Value::from),
            arb_instant().prop_map(Value::Date),
        ]
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        arb_leaf().prop_recursive(4, 64, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::vec(("[a-zA-Z_]{1,8}", inner), 0..6)
                    .prop_map(|fields| Value::object(fields)),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_acyclic_values_roundtrip(value in arb_value()) {
            let text = encode(&value).unwrap();
            prop_assert_eq!(decode(&text).unwrap(), value);
        }
    }
}
