//! JSON parsing with type stamp revival

use cellar_core::{
    DateInstant, Error, Result, Value, TYPE_STAMP_DATE, TYPE_STAMP_FIELD, TYPE_STAMP_ISO_FIELD,
};
use serde_json::{Map as JsonMap, Value as Json};

/// Parse JSON text and restore type-stamped values.
///
/// Only syntactically invalid JSON is an error. Objects that merely resemble a
/// stamp (wrong tag, unparseable instant) are kept as ordinary objects.
pub fn decode(text: &str) -> Result<Value> {
    let json: Json =
        serde_json::from_str(text).map_err(|e| Error::decode_with_source("invalid JSON", e))?;
    Ok(revive(json))
}

/// Restore type-stamped values in an already parsed JSON tree
pub fn revive(json: Json) -> Value {
    match json {
        Json::Object(fields) => match date_stamp(&fields) {
            Some(instant) => Value::Date(instant),
            None => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, item)| (key, revive(item)))
                    .collect(),
            ),
        },
        Json::Array(items) => Value::Array(items.into_iter().map(revive).collect()),
        scalar => Value::from(scalar),
    }
}

fn date_stamp(fields: &JsonMap<String, Json>) -> Option<DateInstant> {
    if fields.get(TYPE_STAMP_FIELD)?.as_str()? != TYPE_STAMP_DATE {
        return None;
    }
    let iso = fields.get(TYPE_STAMP_ISO_FIELD)?.as_str()?;
    DateInstant::parse_iso(iso).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let value = decode(r#"{"a":1,"b":"x"}"#).unwrap();
        assert_eq!(
            value,
            Value::object([("a", Value::from(1)), ("b", Value::from("x"))])
        );
    }

    #[test]
    fn test_stamps_are_revived_at_any_depth() {
        let value =
            decode(r#"[{"due":{"__type":"Date","iso":"2025-01-01T12:00:00.000Z"}}]"#).unwrap();
        let due = value.as_array().unwrap()[0].get("due").unwrap();
        assert_eq!(due.as_date().unwrap().to_iso(), "2025-01-01T12:00:00.000Z");
    }

    #[test]
    fn test_lookalikes_pass_through() {
        let wrong_tag = decode(r#"{"__type":"Map","iso":"2025-01-01T12:00:00.000Z"}"#).unwrap();
        assert!(wrong_tag.as_object().is_some());

        let bad_instant = decode(r#"{"__type":"Date","iso":"not a date"}"#).unwrap();
        assert_eq!(bad_instant.get("iso"), Some(&Value::from("not a date")));
    }

    #[test]
    fn test_circular_marker_stays_a_string() {
        let value = decode(r#"{"self":"[Circular]"}"#).unwrap();
        assert_eq!(value.get("self"), Some(&Value::from("[Circular]")));
    }

    #[test]
    fn test_invalid_json_is_a_decode_error() {
        let err = decode(r#"{"a":"#).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
