use std::collections::BTreeMap;

use crate::encoding::json::{self, EncodeError};
use crate::utils::value::Value;

/// The single shared key-value container backing all of a transformed
/// instance's fields. Keys are field names; the map is owned exclusively by
/// one instance and only mutated through generated accessors.
pub type StorageMap = BTreeMap<String, Value>;

/// Marker capability for types whose fields are proxied through a storage
/// map. Implemented by the `#[dict_backed]` attribute macro; anything
/// carrying it supports the generic JSON dump.
pub trait DictBacked {
    /// Borrows the backing storage map.
    fn storage(&self) -> &StorageMap;

    /// Dumps the current field values as canonical JSON: lexicographically
    /// sorted keys, pretty-printed, byte-identical for equal map contents.
    fn to_json(&self) -> Result<String, EncodeError> {
        json::encode(self.storage())
    }
}

#[test]
fn test_to_json_default_method_delegates_to_encoder() {
    struct Manual {
        storage: StorageMap,
    }

    impl DictBacked for Manual {
        fn storage(&self) -> &StorageMap {
            &self.storage
        }
    }

    let mut storage = StorageMap::new();
    storage.insert("foo".to_string(), Value::Text("bar".to_string()));

    let manual = Manual { storage };
    assert_eq!(manual.to_json().unwrap(), "{\n  \"foo\": \"bar\"\n}");
}
