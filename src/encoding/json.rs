//! Canonical JSON encoding for dictionary-backed storage maps.
//!
//! This module turns a populated storage map into a deterministic JSON text:
//! keys are serialized in lexicographic order regardless of how the map was
//! populated, and the output is pretty-printed, so encoding equal map
//! contents always yields byte-identical strings.
//!
//! # Features
//!
//! * Per-key encodability check before any output is produced
//! * Byte arrays as base64 strings, big integers as decimal strings
//! * Typed, recoverable errors surfaced to the caller
//!
//! # Examples
//!
//! ```
//! use dictbacked::{encode, StorageMap, Value};
//!
//! let mut storage = StorageMap::new();
//! storage.insert("x".to_string(), Value::Integer(123));
//! let json = encode(&storage).unwrap();
//! assert_eq!(json, "{\n  \"x\": 123\n}");
//! ```

use crate::utils::storage::StorageMap;

/// Failure modes of a single encode call. A failed call produces no partial
/// output and leaves the storage map untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// The value stored under `key` has no JSON representation.
    NotEncodable { key: String },
    /// The serializer itself failed. Defensive; not expected in practice.
    Serialize(String),
    /// The serialized buffer was not valid UTF-8. Defensive; not expected
    /// for a conformant serializer.
    InvalidText,
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::NotEncodable { key } => {
                write!(f, "value under key `{}` is not encodable", key)
            }
            EncodeError::Serialize(message) => {
                write!(f, "JSON serialization failed: {}", message)
            }
            EncodeError::InvalidText => write!(f, "encoded JSON is not valid UTF-8"),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Encodes a storage map into canonical JSON text.
///
/// # Arguments
///
/// * `storage` - The populated storage map to encode
///
/// # Returns
///
/// * `Result<String, EncodeError>` - The JSON text, or the first failure
///
/// Every value is first projected into an encodable snapshot; a value with
/// no JSON representation fails the whole call with the offending key and no
/// output is produced. The snapshot map is BTreeMap-backed, so key order in
/// the output is lexicographic whatever the insertion order was.
pub fn encode(storage: &StorageMap) -> Result<String, EncodeError> {
    tracing::trace!("Encoding storage map with {} entries", storage.len());

    let mut snapshot = serde_json::Map::new();

    for (key, value) in storage {
        let json_value = value.to_json_value().ok_or_else(|| {
            tracing::debug!("Value under key `{}` has no JSON representation", key);
            EncodeError::NotEncodable { key: key.clone() }
        })?;
        snapshot.insert(key.clone(), json_value);
    }

    let buffer = serde_json::to_vec_pretty(&serde_json::Value::Object(snapshot))
        .map_err(|error| EncodeError::Serialize(error.to_string()))?;

    String::from_utf8(buffer).map_err(|_| EncodeError::InvalidText)
}

#[allow(dead_code)]
/// Helper function for testing canonical JSON encoding
///
/// # Arguments
///
/// * `entries` - Key-value pairs to populate the storage map with
/// * `expected_value` - Expected JSON text after encoding
fn assert_encodes(entries: Vec<(&str, crate::utils::value::Value)>, expected_value: &str) {
    let storage: StorageMap = entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    assert_eq!(encode(&storage).unwrap(), expected_value);
}

#[test]
fn json_encode_empty_map() {
    assert_encodes(vec![], "{}");
}

#[test]
fn json_encode_primitives() {
    use crate::utils::value::Value;

    assert_encodes(
        vec![
            ("x", Value::Integer(123)),
            ("y", Value::Boolean(false)),
            ("z", Value::Text("456".to_string())),
        ],
        "{\n  \"x\": 123,\n  \"y\": false,\n  \"z\": \"456\"\n}",
    );
}

#[test]
fn json_encode_null_and_decimal() {
    use crate::utils::value::Value;

    assert_encodes(
        vec![("a", Value::Null), ("b", Value::Decimal(99.5))],
        "{\n  \"a\": null,\n  \"b\": 99.5\n}",
    );
}

#[test]
fn json_encode_big_integer_as_string() {
    use crate::utils::value::Value;
    use std::str::FromStr;

    let big = num_bigint::BigInt::from_str("170141183460469231731687303715884105727").unwrap();
    assert_encodes(
        vec![("big", Value::BigInteger(big))],
        "{\n  \"big\": \"170141183460469231731687303715884105727\"\n}",
    );
}

#[test]
fn json_encode_byte_array_as_base64() {
    use crate::utils::value::Value;

    assert_encodes(
        vec![("bytes", Value::ByteArray(b"1234".to_vec()))],
        "{\n  \"bytes\": \"MTIzNA==\"\n}",
    );
}

#[test]
fn json_encode_nested_array_and_dict() {
    use crate::utils::value::Value;
    use std::collections::BTreeMap;

    let mut inner: BTreeMap<String, Value> = BTreeMap::new();
    inner.insert("foo".to_string(), Value::Text("bar".to_string()));

    assert_encodes(
        vec![
            ("array", Value::Array(vec![Value::Integer(1), Value::Integer(2)])),
            ("dict", Value::Dict(inner)),
        ],
        "{\n  \"array\": [\n    1,\n    2\n  ],\n  \"dict\": {\n    \"foo\": \"bar\"\n  }\n}",
    );
}

#[test]
fn json_encode_keys_sorted_lexicographically() {
    use crate::utils::value::Value;

    // Insertion order deliberately scrambled; output order must not follow it.
    let mut storage = StorageMap::new();
    storage.insert("zebra".to_string(), Value::Integer(1));
    storage.insert("alpha".to_string(), Value::Integer(2));
    storage.insert("mid".to_string(), Value::Integer(3));

    let json = encode(&storage).unwrap();
    let alpha = json.find("\"alpha\"").unwrap();
    let mid = json.find("\"mid\"").unwrap();
    let zebra = json.find("\"zebra\"").unwrap();
    assert!(alpha < mid && mid < zebra);
}

#[test]
fn json_encode_is_deterministic() {
    use crate::utils::value::Value;

    let mut first = StorageMap::new();
    first.insert("b".to_string(), Value::Text("two".to_string()));
    first.insert("a".to_string(), Value::Integer(1));

    let mut second = StorageMap::new();
    second.insert("a".to_string(), Value::Integer(1));
    second.insert("b".to_string(), Value::Text("two".to_string()));

    assert_eq!(encode(&first).unwrap(), encode(&second).unwrap());
    assert_eq!(encode(&first).unwrap(), encode(&first).unwrap());
}

#[test]
fn json_encode_non_finite_decimal_is_not_encodable() {
    use crate::utils::value::Value;

    let mut storage = StorageMap::new();
    storage.insert("ok".to_string(), Value::Integer(1));
    storage.insert("nan".to_string(), Value::Decimal(f64::NAN));

    assert_eq!(
        encode(&storage),
        Err(EncodeError::NotEncodable {
            key: "nan".to_string()
        })
    );
}

#[test]
fn json_encode_nested_non_finite_decimal_reports_top_level_key() {
    use crate::utils::value::Value;

    let mut storage = StorageMap::new();
    storage.insert(
        "array".to_string(),
        Value::Array(vec![Value::Integer(1), Value::Decimal(f64::INFINITY)]),
    );

    assert_eq!(
        encode(&storage),
        Err(EncodeError::NotEncodable {
            key: "array".to_string()
        })
    );
}

#[test]
fn json_encode_failure_leaves_map_untouched() {
    use crate::utils::value::Value;

    let mut storage = StorageMap::new();
    storage.insert("ok".to_string(), Value::Integer(1));
    storage.insert("nan".to_string(), Value::Decimal(f64::NAN));

    assert!(encode(&storage).is_err());

    // NaN compares unequal to itself, so check the entries individually
    // instead of comparing whole maps.
    assert_eq!(storage.len(), 2);
    assert_eq!(storage.get("ok"), Some(&Value::Integer(1)));
    match storage.get("nan") {
        Some(Value::Decimal(d)) => assert!(d.is_nan()),
        other => panic!("expected NaN decimal to survive, found {:?}", other),
    }
}

#[test]
fn json_encode_error_display() {
    let error = EncodeError::NotEncodable {
        key: "foo".to_string(),
    };
    assert_eq!(error.to_string(), "value under key `foo` is not encodable");
    assert_eq!(
        EncodeError::InvalidText.to_string(),
        "encoded JSON is not valid UTF-8"
    );
}
