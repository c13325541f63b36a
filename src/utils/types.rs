use crate::utils::value::{Value, ValueError};
use num_bigint::BigInt;
use std::collections::BTreeMap;

/// Conversion from a concrete field type into a storage map value.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Typed unwrap of a storage map value back into a concrete field type.
///
/// Fails with [`ValueError::TypeMismatch`] when the stored variant disagrees
/// with the requested type, which in generated accessors signals storage
/// corruption rather than a recoverable condition.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ValueError>;
}

impl ToValue for i8 {
    fn to_value(&self) -> Value {
        Value::Integer((*self).into())
    }
}

impl ToValue for i16 {
    fn to_value(&self) -> Value {
        Value::Integer((*self).into())
    }
}

impl ToValue for i32 {
    fn to_value(&self) -> Value {
        Value::Integer((*self).into())
    }
}

impl ToValue for i64 {
    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }
}

impl ToValue for i128 {
    fn to_value(&self) -> Value {
        Value::BigInteger((*self).into())
    }
}

impl ToValue for BigInt {
    fn to_value(&self) -> Value {
        Value::BigInteger(self.clone())
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Decimal(*self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::ByteArray(self.clone())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        let values: Vec<Value> = self.iter().map(|item| item.to_value()).collect();
        Value::Array(values)
    }
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        let dict: BTreeMap<String, Value> = self
            .iter()
            .map(|(key, value)| (key.clone(), value.to_value()))
            .collect();
        Value::Dict(dict)
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

fn mismatch(expected: &'static str, found: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected,
        found: found.variant_name(),
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Boolean(b) => Ok(*b),
            other => Err(mismatch("boolean", other)),
        }
    }
}

impl FromValue for i8 {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Integer(i) => (*i)
                .try_into()
                .map_err(|_| ValueError::OutOfRange { expected: "i8" }),
            other => Err(mismatch("integer", other)),
        }
    }
}

impl FromValue for i16 {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Integer(i) => (*i)
                .try_into()
                .map_err(|_| ValueError::OutOfRange { expected: "i16" }),
            other => Err(mismatch("integer", other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Integer(i) => (*i)
                .try_into()
                .map_err(|_| ValueError::OutOfRange { expected: "i32" }),
            other => Err(mismatch("integer", other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Integer(i) => Ok(*i),
            other => Err(mismatch("integer", other)),
        }
    }
}

impl FromValue for i128 {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::BigInteger(big) => {
                i128::try_from(big).map_err(|_| ValueError::OutOfRange { expected: "i128" })
            }
            other => Err(mismatch("big integer", other)),
        }
    }
}

impl FromValue for BigInt {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::BigInteger(big) => Ok(big.clone()),
            other => Err(mismatch("big integer", other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Decimal(d) => Ok(*d),
            other => Err(mismatch("decimal", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(text) => Ok(text.clone()),
            other => Err(mismatch("text", other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::ByteArray(bytes) => Ok(bytes.clone()),
            other => Err(mismatch("byte array", other)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Array(array) => array.iter().map(T::from_value).collect(),
            other => Err(mismatch("array", other)),
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Dict(dict) => dict
                .iter()
                .map(|(key, value)| Ok((key.clone(), T::from_value(value)?)))
                .collect(),
            other => Err(mismatch("dict", other)),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        Ok(value.clone())
    }
}

#[test]
fn test_integer_to_value() {
    let i: i32 = 1;
    let r = i.to_value();
    assert_eq!(Value::Integer(i.into()), r);

    let ii: i128 = 1234567890;
    let r = ii.to_value();
    assert_eq!(Value::BigInteger(ii.into()), r);
}

#[test]
fn test_decimal_to_value() {
    let f: f64 = 1.234;
    let r = f.to_value();
    assert_eq!(Value::Decimal(f), r);
}

#[test]
fn test_string_to_value() {
    let s: String = "Hello!".to_string();
    let r = s.to_value();
    assert_eq!(Value::Text(s.clone()), r);

    let ss: &str = "Hello!";
    let r = ss.to_value();
    assert_eq!(Value::Text(ss.to_string()), r);
}

#[test]
fn test_bool_to_value() {
    let b = true;
    let r = b.to_value();
    assert_eq!(Value::Boolean(b), r);
}

#[test]
fn test_bytearray_to_value() {
    let ba = b"123456".to_vec();
    let r = ba.to_value();
    assert_eq!(Value::ByteArray(ba), r);
}

#[test]
fn test_collections_to_value() {
    let array = vec!["arg1".to_string(), "arg2".to_string()];
    assert_eq!(
        array.to_value(),
        Value::Array(vec![
            Value::Text("arg1".to_string()),
            Value::Text("arg2".to_string())
        ])
    );

    let dict = BTreeMap::from([("key".to_string(), 1_i64)]);
    assert_eq!(
        dict.to_value(),
        Value::Dict(BTreeMap::from([("key".to_string(), Value::Integer(1))]))
    );
}

#[test]
fn test_from_value_roundtrips() {
    assert_eq!(i64::from_value(&Value::Integer(99)), Ok(99));
    assert_eq!(bool::from_value(&Value::Boolean(false)), Ok(false));
    assert_eq!(
        String::from_value(&Value::Text("456".to_string())),
        Ok("456".to_string())
    );
    assert_eq!(f64::from_value(&Value::Decimal(3.14)), Ok(3.14));
    assert_eq!(
        Vec::<u8>::from_value(&Value::ByteArray(b"1234".to_vec())),
        Ok(b"1234".to_vec())
    );
    assert_eq!(
        Vec::<i64>::from_value(&Value::Array(vec![Value::Integer(1), Value::Integer(2)])),
        Ok(vec![1, 2])
    );
    assert_eq!(
        i128::from_value(&Value::BigInteger(BigInt::from(i128::MAX))),
        Ok(i128::MAX)
    );
}

#[test]
fn test_from_value_type_mismatch() {
    let error = i64::from_value(&Value::Text("not a number".to_string())).unwrap_err();
    assert_eq!(
        error,
        ValueError::TypeMismatch {
            expected: "integer",
            found: "text"
        }
    );
}

#[test]
fn test_from_value_out_of_range() {
    let error = i8::from_value(&Value::Integer(1024)).unwrap_err();
    assert_eq!(error, ValueError::OutOfRange { expected: "i8" });
}
