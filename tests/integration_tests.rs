use dictbacked::{dict_backed, DictBacked, EncodeError, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[dict_backed]
#[derive(Debug, Clone, PartialEq)]
struct MyStruct {
    x: i64,
    y: bool,
    z: String,
}

#[dict_backed]
struct Mixed {
    small: i32,
    ratio: f64,
    raw: Vec<u8>,
    huge: i128,
}

#[dict_backed]
struct Nothing {}

// Field names deliberately out of lexicographic order.
#[dict_backed]
struct Scrambled {
    zebra: i64,
    alpha: i64,
    mid: i64,
}

// A user-declared `_storage` member is reserved and skipped by extraction.
#[dict_backed]
struct WithReserved {
    a: i64,
    _storage: dictbacked::StorageMap,
}

#[test]
fn construction_roundtrip_through_accessors() {
    init_tracing();

    let value = MyStruct::new(123, false, "456".to_string());
    assert_eq!(value.x(), 123);
    assert!(!value.y());
    assert_eq!(value.z(), "456");
}

#[test]
fn setter_overwrites_and_getter_observes() {
    let mut value = MyStruct::new(123, false, "456".to_string());
    value.set_x(789);
    value.set_y(true);
    assert_eq!(value.x(), 789);
    assert!(value.y());
    assert_eq!(value.z(), "456");
}

#[test]
fn storage_key_set_equals_declared_field_names() {
    let value = MyStruct::new(123, false, "456".to_string());
    let keys: Vec<&str> = value.storage().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["x", "y", "z"]);
}

#[test]
fn write_touches_only_its_own_key() {
    let mut value = MyStruct::new(123, false, "456".to_string());
    value.set_y(true);

    let storage = value.storage();
    assert_eq!(storage.get("x"), Some(&Value::Integer(123)));
    assert_eq!(storage.get("y"), Some(&Value::Boolean(true)));
    assert_eq!(storage.get("z"), Some(&Value::Text("456".to_string())));
    assert_eq!(storage.len(), 3);
}

#[test]
fn encode_is_deterministic_regardless_of_write_order() {
    let first = MyStruct::new(123, false, "456".to_string());

    // Same logical contents, arrived at through a different mutation order.
    let mut second = MyStruct::new(0, true, String::new());
    second.set_z("456".to_string());
    second.set_y(false);
    second.set_x(123);

    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    assert_eq!(first.to_json().unwrap(), first.to_json().unwrap());
}

#[test]
fn encode_orders_keys_lexicographically() {
    let value = Scrambled::new(1, 2, 3);
    let json = value.to_json().unwrap();

    let alpha = json.find("\"alpha\"").unwrap();
    let mid = json.find("\"mid\"").unwrap();
    let zebra = json.find("\"zebra\"").unwrap();
    assert!(alpha < mid && mid < zebra);
}

#[test]
fn encode_example_end_to_end() {
    let value = MyStruct::new(123, false, "456".to_string());
    assert_eq!(
        value.to_json().unwrap(),
        "{\n  \"x\": 123,\n  \"y\": false,\n  \"z\": \"456\"\n}"
    );
}

#[test]
fn encode_mixed_field_types() {
    let value = Mixed::new(7, 2.5, b"1234".to_vec(), i128::MAX);

    assert_eq!(value.small(), 7);
    assert_eq!(value.ratio(), 2.5);
    assert_eq!(value.raw(), b"1234".to_vec());
    assert_eq!(value.huge(), i128::MAX);

    assert_eq!(
        value.to_json().unwrap(),
        "{\n  \"huge\": \"170141183460469231731687303715884105727\",\n  \"ratio\": 2.5,\n  \"raw\": \"MTIzNA==\",\n  \"small\": 7\n}"
    );
}

#[test]
fn encode_non_encodable_value_fails_with_key() {
    let mut value = Mixed::new(7, 2.5, Vec::new(), 0);
    value.set_ratio(f64::NAN);

    assert_eq!(
        value.to_json(),
        Err(EncodeError::NotEncodable {
            key: "ratio".to_string()
        })
    );

    // The map itself is untouched by the failed encode attempt.
    assert_eq!(value.small(), 7);
    assert_eq!(value.storage().len(), 4);
}

#[test]
fn empty_struct_has_empty_storage_and_encodes_to_empty_object() {
    let value = Nothing::new();
    assert!(value.storage().is_empty());
    assert_eq!(value.to_json().unwrap(), "{}");
}

#[test]
fn reserved_storage_member_is_not_a_field() {
    let value = WithReserved::new(5);
    let keys: Vec<&str> = value.storage().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a"]);
    assert_eq!(value.a(), 5);
}

#[test]
fn struct_attributes_survive_the_rewrite() {
    let value = MyStruct::new(123, false, "456".to_string());
    let copy = value.clone();
    assert_eq!(value, copy);
    assert!(format!("{:?}", value).contains("MyStruct"));
}
