use dictbacked::{dict_backed, DictBacked};

/// `MyStruct` is rewritten onto dictionary storage and conformed to
/// `DictBacked`, which provides `to_json`.
#[dict_backed]
struct MyStruct {
    x: i64,
    y: bool,
    z: String,
}

fn main() {
    let value = MyStruct::new(123, false, "456".to_string());

    match value.to_json() {
        Ok(json) => println!("{}", json),
        Err(error) => eprintln!("encode failed: {}", error),
    }
}
