//! Records: value types whose whole state is one [`RawStore`].

use serde_json::Value;

use crate::error::InvalidDataError;
use crate::raw::RawStore;

/// A raw-backed record. Typed accessors are views over [`Record::raw`].
pub trait Record: Sized {
    /// Wrap a store without decoding anything.
    fn from_raw(raw: RawStore) -> Self;

    /// The backing store.
    fn raw(&self) -> &RawStore;

    /// Parse a JSON object into a record without decoding any field yet.
    fn from_json(bytes: &[u8]) -> Result<Self, InvalidDataError> {
        RawStore::from_slice(bytes).map(Self::from_raw)
    }

    /// The record as a JSON object, unknown keys included.
    fn to_json_value(&self) -> Value {
        self.raw().to_value()
    }
}

/// Declare a record type backed by a [`RawStore`].
///
/// The generated type gets `Clone`, `PartialEq`, `Eq`, `Hash`, `Debug`,
/// `Serialize`, `Deserialize` and [`Record`]; typed accessors and the
/// `Validate` impl are written next to it.
///
/// ```
/// use meridian_core::Record;
///
/// meridian_core::raw_record! {
///     /// A party to a payment.
///     pub struct Party;
/// }
///
/// impl Party {
///     pub fn name(&self) -> Result<String, meridian_core::InvalidDataError> {
///         self.raw.get_required("name")
///     }
/// }
///
/// let party = Party::from_json(br#"{"name":"Acme"}"#).unwrap();
/// assert_eq!(party.name().unwrap(), "Acme");
/// ```
#[macro_export]
macro_rules! raw_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash)]
        $vis struct $name {
            raw: $crate::RawStore,
        }

        impl $crate::Record for $name {
            fn from_raw(raw: $crate::RawStore) -> Self {
                Self { raw }
            }

            fn raw(&self) -> &$crate::RawStore {
                &self.raw
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.raw).finish()
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::__private::serde::Serialize::serialize(&self.raw, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                <$crate::RawStore as $crate::__private::serde::Deserialize<'de>>::deserialize(
                    deserializer,
                )
                .map(|raw| Self { raw })
            }
        }
    };
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::validate::{Validate, validate_field};
    use crate::{ApiEnum, Nullable};
    use serde_json::json;

    crate::wire_enum! {
        enum Color {
            Red => "red",
            Blue => "blue",
        }
    }

    crate::raw_record! {
        struct Swatch;
    }

    impl Swatch {
        fn name(&self) -> Result<String, InvalidDataError> {
            self.raw.get_required("name")
        }

        fn color(&self) -> Result<ApiEnum<Color>, InvalidDataError> {
            self.raw.get_required("color")
        }

        fn note(&self) -> Result<Nullable<String>, InvalidDataError> {
            self.raw.get_optional_nullable("note")
        }
    }

    impl Validate for Swatch {
        fn validate(&self) -> Result<(), InvalidDataError> {
            validate_field("name", &self.name()?)?;
            validate_field("color", &self.color()?)?;
            validate_field("note", &self.note()?)?;
            Ok(())
        }
    }

    #[test]
    fn test_record_round_trip() {
        let swatch = Swatch::from_json(br#"{"name":"sky","color":"blue","note":null}"#).unwrap();
        let encoded = serde_json::to_string(&swatch).unwrap();
        assert_eq!(encoded, r#"{"name":"sky","color":"blue","note":null}"#);

        let decoded: Swatch = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, swatch);
        assert_eq!(decoded.note().unwrap(), Nullable::Null);
    }

    #[test]
    fn test_lazy_decode_until_read() {
        let swatch = Swatch::from_raw(RawStore::from_value(json!({"color": "teal"})).unwrap());
        assert!(swatch.color().is_ok());
        assert!(swatch.name().is_err());
    }

    #[test]
    fn test_validate_reports_first_invalid_field_only() {
        let swatch = Swatch::from_raw(RawStore::from_value(json!({"color": "teal"})).unwrap());
        let err = swatch.validate().unwrap_err();
        assert_eq!(err.field(), Some("name"));

        let swatch = Swatch::from_raw(
            RawStore::from_value(json!({"name": "sea", "color": "teal", "note": 5})).unwrap(),
        );
        let err = swatch.validate().unwrap_err();
        assert_eq!(err.field(), Some("color"));
    }

    #[test]
    fn test_to_json_value() {
        let swatch = Swatch::from_json(br#"{"name":"x","color":"red"}"#).unwrap();
        assert_eq!(swatch.to_json_value(), json!({"name": "x", "color": "red"}));
        assert!(format!("{swatch:?}").starts_with("Swatch("));
    }
}
