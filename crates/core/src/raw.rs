//! The raw store: an ordered map of wire names to loosely-typed JSON values.
//!
//! Every record is a view over one of these. Construction happens on a
//! [`RawStoreBuilder`]; [`RawStoreBuilder::freeze`] turns it into an immutable
//! [`RawStore`] snapshot that can be shared across threads and read through
//! the typed accessors below.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::InvalidDataError;
use crate::nullable::Nullable;

/// Mutable phase of a raw store.
///
/// Writes never fail on the spot. A value that cannot be serialized poisons
/// the builder and the first such failure is returned by [`freeze`].
///
/// [`freeze`]: RawStoreBuilder::freeze
#[derive(Debug, Default)]
pub struct RawStoreBuilder {
    entries: Map<String, Value>,
    error: Option<InvalidDataError>,
}

impl RawStoreBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `value` and store it under `key`.
    ///
    /// Overwriting an existing key keeps its original position.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> &mut Self {
        match serde_json::to_value(value) {
            Ok(encoded) => {
                self.entries.insert(key.to_string(), encoded);
            }
            Err(source) => {
                if self.error.is_none() {
                    self.error = Some(InvalidDataError::encode(key, source));
                }
            }
        }
        self
    }

    /// Initializer for optional-non-nullable fields: `None` leaves the key
    /// untouched, exactly as if it had never been set.
    pub fn set_optional<T: Serialize>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.set(key, &value);
        }
        self
    }

    /// Initializer for optional-nullable fields: `None` writes JSON `null`.
    pub fn set_nullable<T: Serialize>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        match value {
            Some(value) => self.set(key, &value),
            None => self.set_raw(key, Value::Null),
        }
    }

    /// Store an already-encoded JSON value.
    pub fn set_raw(&mut self, key: &str, value: Value) -> &mut Self {
        self.entries.insert(key.to_string(), value);
        self
    }

    /// Remove `key`, keeping the relative order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Whether `key` has been written.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys written so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot the builder into an immutable store.
    ///
    /// The key set and values are fixed from here on.
    pub fn freeze(self) -> Result<RawStore, InvalidDataError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(RawStore::from_map(self.entries)),
        }
    }
}

/// Frozen phase of a raw store.
///
/// Cloning is cheap and clones share the same snapshot. Equality ignores key
/// order; serialization emits keys in insertion order.
#[derive(Clone, Default)]
pub struct RawStore {
    entries: Arc<Map<String, Value>>,
}

impl RawStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze an existing JSON map.
    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Wrap a JSON object. Any other JSON value is invalid data.
    pub fn from_value(value: Value) -> Result<Self, InvalidDataError> {
        match value {
            Value::Object(entries) => Ok(Self::from_map(entries)),
            other => Err(InvalidDataError::not_an_object(&other)),
        }
    }

    /// Parse a JSON response body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, InvalidDataError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|source| InvalidDataError::Malformed { source })?;
        Self::from_value(value)
    }

    /// The raw JSON value under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether `key` is present, even if null.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The underlying ordered map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Copy the store into a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.as_ref().clone())
    }

    /// Reopen a mutable copy that starts from this snapshot.
    pub fn to_builder(&self) -> RawStoreBuilder {
        RawStoreBuilder {
            entries: self.entries.as_ref().clone(),
            error: None,
        }
    }

    /// Whether both stores share the same snapshot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// Fail on the first key that is absent or null.
    pub fn require(&self, keys: &[&str]) -> Result<(), InvalidDataError> {
        for key in keys {
            match self.entries.get(*key) {
                None => return Err(InvalidDataError::missing(*key)),
                Some(Value::Null) => return Err(InvalidDataError::null(*key)),
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Read a required field: absent or null is invalid data.
    pub fn get_required<T: DeserializeOwned>(&self, key: &str) -> Result<T, InvalidDataError> {
        match self.entries.get(key) {
            None => Err(InvalidDataError::missing(key)),
            Some(Value::Null) => Err(InvalidDataError::null(key)),
            Some(value) => decode(key, value),
        }
    }

    /// Read an optional-non-nullable field: absent and null both read as `None`.
    pub fn get_optional<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, InvalidDataError> {
        match self.entries.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => decode(key, value).map(Some),
        }
    }

    /// Read an optional-nullable field, keeping absent and null apart.
    pub fn get_optional_nullable<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Nullable<T>, InvalidDataError> {
        match self.entries.get(key) {
            None => Ok(Nullable::Absent),
            Some(Value::Null) => Ok(Nullable::Null),
            Some(value) => decode(key, value).map(Nullable::Value),
        }
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T, InvalidDataError> {
    T::deserialize(value).map_err(|source| InvalidDataError::decode(key, source))
}

impl PartialEq for RawStore {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.entries == other.entries
    }
}

impl Eq for RawStore {}

impl Hash for RawStore {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_object(&self.entries, state);
    }
}

impl std::fmt::Debug for RawStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl Serialize for RawStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self::from_map)
    }
}

/// Hash a JSON value consistently with `Value`'s equality: object keys are
/// visited in sorted order so insertion order does not leak into the hash.
pub fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => state.write_u8(0),
        Value::Bool(flag) => {
            state.write_u8(1);
            flag.hash(state);
        }
        Value::Number(number) => {
            state.write_u8(2);
            number.hash(state);
        }
        Value::String(text) => {
            state.write_u8(3);
            text.hash(state);
        }
        Value::Array(items) => {
            state.write_u8(4);
            state.write_usize(items.len());
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Object(entries) => {
            state.write_u8(5);
            hash_object(entries, state);
        }
    }
}

fn hash_object<H: Hasher>(entries: &Map<String, Value>, state: &mut H) {
    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort_unstable();
    state.write_usize(keys.len());
    for key in keys {
        key.hash(state);
        hash_value(&entries[key.as_str()], state);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(store: &RawStore) -> u64 {
        let mut hasher = DefaultHasher::new();
        store.hash(&mut hasher);
        hasher.finish()
    }

    fn store(value: Value) -> RawStore {
        RawStore::from_value(value).unwrap()
    }

    #[test]
    fn test_set_preserves_first_insertion_order() {
        let mut builder = RawStoreBuilder::new();
        builder.set("b", &1).set("a", &2).set("b", &3);
        let frozen = builder.freeze().unwrap();

        assert_eq!(frozen.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(frozen.get("b"), Some(&json!(3)));
        assert_eq!(serde_json::to_string(&frozen).unwrap(), r#"{"b":3,"a":2}"#);
    }

    #[test]
    fn test_set_optional_none_is_a_no_op() {
        let mut unset = RawStoreBuilder::new();
        unset.set("amount", &0);
        let mut explicit = RawStoreBuilder::new();
        explicit.set("amount", &0).set_optional::<String>("ref", None);

        let unset = unset.freeze().unwrap();
        let explicit = explicit.freeze().unwrap();
        assert!(!explicit.contains_key("ref"));
        assert_eq!(unset, explicit);
    }

    #[test]
    fn test_set_nullable_none_writes_null() {
        let mut builder = RawStoreBuilder::new();
        builder.set_nullable::<String>("description", None);
        let frozen = builder.freeze().unwrap();

        assert!(frozen.contains_key("description"));
        assert_eq!(frozen.get("description"), Some(&Value::Null));
        assert_eq!(
            frozen.get_optional_nullable::<String>("description").unwrap(),
            Nullable::Null
        );
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut builder = RawStoreBuilder::new();
        builder.set("a", &1).set("b", &2).set("c", &3);
        assert_eq!(builder.remove("a"), Some(json!(1)));
        let frozen = builder.freeze().unwrap();
        assert_eq!(frozen.keys().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_encode_failure_poisons_freeze() {
        let mut bad: BTreeMap<Vec<u8>, i32> = BTreeMap::new();
        bad.insert(vec![1], 1);

        let mut builder = RawStoreBuilder::new();
        builder.set("ok", &1).set("bad", &bad).set("later", &2);
        let err = builder.freeze().unwrap_err();

        assert!(matches!(err, InvalidDataError::Encode { .. }));
        assert_eq!(err.field(), Some("bad"));
    }

    #[test]
    fn test_equality_ignores_key_order() {
        let left = store(json!({"a": 1, "b": {"x": true, "y": [1, 2]}}));
        let right = store(json!({"b": {"y": [1, 2], "x": true}, "a": 1}));

        assert_eq!(left, right);
        assert_eq!(hash_of(&left), hash_of(&right));
    }

    #[test]
    fn test_signed_zero_hashes_like_it_compares() {
        let positive = RawStore::from_slice(br#"{"amount":0.0}"#).unwrap();
        let negative = RawStore::from_slice(br#"{"amount":-0.0}"#).unwrap();

        assert_eq!(positive, negative);
        assert_eq!(hash_of(&positive), hash_of(&negative));

        let nested = store(json!({"a": [{"b": 0.0}]}));
        assert_eq!(hash_of(&nested), hash_of(&store(json!({"a": [{"b": -0.0}]}))));
    }

    #[test]
    fn test_equality_is_structural() {
        let left = store(json!({"a": 1}));
        assert_ne!(left, store(json!({"a": 2})));
        assert_ne!(left, store(json!({"a": 1, "b": null})));
        assert_ne!(store(json!({"a": [1, 2]})), store(json!({"a": [2, 1]})));
    }

    #[test]
    fn test_clones_share_the_snapshot() {
        let frozen = store(json!({"a": 1}));
        let copy = frozen.clone();
        assert!(frozen.ptr_eq(&copy));
        assert_eq!(frozen, copy);
    }

    #[test]
    fn test_to_builder_reopens_a_copy() {
        let frozen = store(json!({"a": 1, "b": 2}));
        let mut reopened = frozen.to_builder();
        reopened.set("a", &10).set("c", &3);
        let changed = reopened.freeze().unwrap();

        assert_eq!(frozen.get("a"), Some(&json!(1)));
        assert!(!frozen.contains_key("c"));
        assert_eq!(changed.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(changed.get("a"), Some(&json!(10)));
    }

    #[test]
    fn test_get_required() {
        let frozen = store(json!({"amount": 0, "ref": null, "party_id": 7}));

        assert_eq!(frozen.get_required::<i64>("amount").unwrap(), 0);

        let missing = frozen.get_required::<String>("currency").unwrap_err();
        assert!(matches!(missing, InvalidDataError::Missing { .. }));
        assert_eq!(missing.field(), Some("currency"));

        let null = frozen.get_required::<String>("ref").unwrap_err();
        assert!(matches!(null, InvalidDataError::Null { .. }));

        let wrong = frozen.get_required::<String>("party_id").unwrap_err();
        assert!(matches!(wrong, InvalidDataError::Decode { .. }));
        assert_eq!(wrong.field(), Some("party_id"));
    }

    #[test]
    fn test_get_optional_collapses_null() {
        let frozen = store(json!({"ref": null, "currency": "usd"}));

        assert_eq!(frozen.get_optional::<String>("ref").unwrap(), None);
        assert_eq!(frozen.get_optional::<String>("missing").unwrap(), None);
        assert_eq!(
            frozen.get_optional::<String>("currency").unwrap(),
            Some("usd".to_string())
        );
        assert!(frozen.get_optional::<i64>("currency").is_err());
    }

    #[test]
    fn test_get_optional_nullable_tristate() {
        let frozen = store(json!({"explicit": null, "set": "x"}));

        assert_eq!(
            frozen.get_optional_nullable::<String>("absent").unwrap(),
            Nullable::Absent
        );
        assert_eq!(
            frozen.get_optional_nullable::<String>("explicit").unwrap(),
            Nullable::Null
        );
        assert_eq!(
            frozen.get_optional_nullable::<String>("set").unwrap(),
            Nullable::Value("x".to_string())
        );
    }

    #[test]
    fn test_require_reports_first_failure() {
        let frozen = store(json!({"a": 1, "b": null}));
        assert!(frozen.require(&["a"]).is_ok());
        let err = frozen.require(&["a", "b", "c"]).unwrap_err();
        assert!(matches!(err, InvalidDataError::Null { .. }));
        assert_eq!(err.field(), Some("b"));
    }

    #[test]
    fn test_from_slice_rejects_non_objects() {
        assert!(matches!(
            RawStore::from_slice(b"[1,2]").unwrap_err(),
            InvalidDataError::NotAnObject { .. }
        ));
        assert!(matches!(
            RawStore::from_slice(b"{not json").unwrap_err(),
            InvalidDataError::Malformed { .. }
        ));
        assert!(RawStore::from_slice(b"{}").unwrap().is_empty());
    }
}
