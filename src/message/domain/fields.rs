//! Field readers shared by the `from_json` reconstructions.
//!
//! Readers distinguish a missing key (a schema failure) from a key that is
//! present with the wrong shape (a validation failure).

use serde_json::{Map, Value};

use crate::message::{
    error::{DecodeError, ValidationError},
    ports::decoder::{DecodeResult, DecoderConfig},
};

/// The marker legacy documents write for an unset value.
pub(crate) const LEGACY_NONE: &str = "None";

/// Views `value` as a JSON object.
pub(crate) fn object<'a>(value: &'a Value, field: &str) -> Result<&'a Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::invalid_field(field, "expected a JSON object"))
}

/// Returns the value under `key`, failing when the key is absent.
pub(crate) fn require<'a>(content: &'a Map<String, Value>, key: &str) -> DecodeResult<&'a Value> {
    content.get(key).ok_or_else(|| DecodeError::missing(key))
}

/// Returns the string under `key`, failing when absent or not a string.
pub(crate) fn require_str(content: &Map<String, Value>, key: &str) -> DecodeResult<String> {
    let value = require(content, key)?;
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| ValidationError::not_a_string(key).into())
}

/// Returns the string under `key`, treating absence and `null` as unset.
pub(crate) fn optional_str(
    content: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, ValidationError> {
    match content.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(ValidationError::not_a_string(key)),
    }
}

/// Returns the string list under `key`, treating absence and `null` as unset.
pub(crate) fn optional_str_list(
    content: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<Vec<String>>, ValidationError> {
    match content.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| ValidationError::not_a_string_list(key))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(ValidationError::not_a_string_list(key)),
    }
}

/// Reads an optional non-negative integer under `key`.
///
/// Absent keys, `null`, and (when enabled) the legacy `"None"` marker are
/// unset. Numeric strings are coerced when the config allows it.
pub(crate) fn optional_unsigned(
    content: &Map<String, Value>,
    key: &str,
    config: &DecoderConfig,
) -> Result<Option<u64>, ValidationError> {
    match content.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => {
            if let Some(unsigned) = number.as_u64() {
                Ok(Some(unsigned))
            } else if let Some(signed) = number.as_i64() {
                Err(ValidationError::NegativeValue {
                    field: key.to_owned(),
                    value: signed,
                })
            } else {
                Err(ValidationError::invalid_integer(
                    key,
                    format!("expected a whole number, got {number}"),
                ))
            }
        }
        Some(Value::String(text)) if config.accept_legacy_none_marker && text == LEGACY_NONE => {
            Ok(None)
        }
        Some(Value::String(text)) if config.coerce_numeric_strings => {
            let parsed: i64 = text
                .trim()
                .parse()
                .map_err(|err| ValidationError::invalid_integer(key, format!("'{text}': {err}")))?;
            u64::try_from(parsed).map(Some).map_err(|_| ValidationError::NegativeValue {
                field: key.to_owned(),
                value: parsed,
            })
        }
        Some(other) => Err(ValidationError::invalid_integer(
            key,
            format!("unexpected value {other}"),
        )),
    }
}

/// Narrows an unsigned value into a smaller integer type, naming the field.
pub(crate) fn narrow<T: TryFrom<u64>>(key: &str, value: u64) -> Result<T, ValidationError> {
    T::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: key.to_owned(),
        value: i64::try_from(value).unwrap_or(i64::MAX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn content(value: Value) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("port".to_owned(), value);
        map
    }

    #[rstest]
    #[case(json!(4242), Some(4242))]
    #[case(json!(0), Some(0))]
    #[case(json!(null), None)]
    #[case(json!("None"), None)]
    #[case(json!("104"), Some(104))]
    #[case(json!(" 11112 "), Some(11112))]
    fn optional_unsigned_accepts_supported_shapes(#[case] value: Value, #[case] expected: Option<u64>) {
        let result = optional_unsigned(&content(value), "port", &DecoderConfig::default());
        assert_eq!(result, Ok(expected));
    }

    #[rstest]
    #[case(json!(-1))]
    #[case(json!("-5"))]
    fn optional_unsigned_rejects_negative_values(#[case] value: Value) {
        let result = optional_unsigned(&content(value), "port", &DecoderConfig::default());
        assert!(matches!(
            result,
            Err(ValidationError::NegativeValue { ref field, .. }) if field == "port"
        ));
    }

    #[rstest]
    #[case(json!(1.5))]
    #[case(json!("abc"))]
    #[case(json!(true))]
    #[case(json!([1]))]
    fn optional_unsigned_rejects_non_integers(#[case] value: Value) {
        let result = optional_unsigned(&content(value), "port", &DecoderConfig::default());
        assert!(matches!(result, Err(ValidationError::InvalidInteger { .. })));
    }

    #[test]
    fn strict_config_rejects_legacy_marker_and_numeric_strings() {
        let config = DecoderConfig::strict();
        assert!(optional_unsigned(&content(json!("None")), "port", &config).is_err());
        assert!(optional_unsigned(&content(json!("104")), "port", &config).is_err());
    }

    #[test]
    fn missing_key_is_unset() {
        let result = optional_unsigned(&Map::new(), "port", &DecoderConfig::default());
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn narrow_reports_out_of_range_values() {
        let result: Result<u16, _> = narrow("port", 70_000);
        assert!(matches!(
            result,
            Err(ValidationError::OutOfRange { value: 70_000, .. })
        ));
    }

    #[test]
    fn require_str_distinguishes_missing_from_wrong_type() {
        let mut map = Map::new();
        map.insert("addr".to_owned(), json!(17));

        assert!(matches!(
            require_str(&map, "ae_title"),
            Err(DecodeError::Schema { ref field }) if field == "ae_title"
        ));
        assert!(matches!(
            require_str(&map, "addr"),
            Err(DecodeError::Validation(ValidationError::NotAString { .. }))
        ));
    }
}
