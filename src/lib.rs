//! Dictionary-backed structs.
//!
//! Annotating a struct with `#[dict_backed]` rewrites it so that every
//! declared field is backed by one shared string-keyed storage map instead of
//! its own slot: the macro synthesizes per-field accessor pairs redirecting
//! to the map, a constructor mirroring the fields in declaration order, and
//! an implementation of [`DictBacked`] providing a canonical JSON dump of the
//! current field values.
//!
//! # Example
//! ```
//! use dictbacked::{dict_backed, DictBacked};
//!
//! #[dict_backed]
//! struct MyStruct {
//!     x: i64,
//!     y: bool,
//!     z: String,
//! }
//!
//! let value = MyStruct::new(123, false, "456".to_string());
//! assert_eq!(value.x(), 123);
//! assert_eq!(
//!     value.to_json().unwrap(),
//!     "{\n  \"x\": 123,\n  \"y\": false,\n  \"z\": \"456\"\n}"
//! );
//! ```

pub mod encoding;
pub mod utils;

pub use dictbacked_derive::dict_backed;

pub use encoding::json::{encode, EncodeError};
pub use utils::storage::{DictBacked, StorageMap};
pub use utils::types::{FromValue, ToValue};
pub use utils::value::{Value, ValueError};
