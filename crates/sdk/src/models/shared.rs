use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use meridian_core::{InvalidDataError, Nullable, RawStore, Record, Validate, validate_field};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One page of a cursor-paginated list.
pub struct Page<T> {
    raw: RawStore,
    _item: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Page<T> {
    /// Items on this page.
    pub fn data(&self) -> Result<Vec<T>, InvalidDataError> {
        self.raw.get_required("data")
    }

    /// Whether another page follows.
    pub fn has_more(&self) -> Result<bool, InvalidDataError> {
        self.raw.get_required("has_more")
    }

    /// Cursor for the next page; null on the last page.
    pub fn next_cursor(&self) -> Result<Nullable<String>, InvalidDataError> {
        self.raw.get_optional_nullable("next_cursor")
    }
}

impl<T> Record for Page<T> {
    fn from_raw(raw: RawStore) -> Self {
        Self {
            raw,
            _item: PhantomData,
        }
    }

    fn raw(&self) -> &RawStore {
        &self.raw
    }
}

impl<T: DeserializeOwned + Validate> Validate for Page<T> {
    fn validate(&self) -> Result<(), InvalidDataError> {
        validate_field("data", &self.data()?)?;
        validate_field("has_more", &self.has_more()?)?;
        validate_field("next_cursor", &self.next_cursor()?)?;
        Ok(())
    }
}

impl<T> Clone for Page<T> {
    fn clone(&self) -> Self {
        Self::from_raw(self.raw.clone())
    }
}

impl<T> PartialEq for Page<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Page<T> {}

impl<T> Hash for Page<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Page<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Page").field(&self.raw).finish()
    }
}

impl<T> Serialize for Page<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawStore::deserialize(deserializer).map(Self::from_raw)
    }
}

meridian_core::raw_record! {
    /// Acknowledgement of a delete.
    pub struct Deleted;
}

impl Deleted {
    /// Id of the deleted object.
    pub fn id(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("id")
    }

    /// Always `true` on success.
    pub fn deleted(&self) -> Result<bool, InvalidDataError> {
        self.raw.get_required("deleted")
    }
}

impl Validate for Deleted {
    fn validate(&self) -> Result<(), InvalidDataError> {
        validate_field("id", &self.id()?)?;
        validate_field("deleted", &self.deleted()?)?;
        Ok(())
    }
}
