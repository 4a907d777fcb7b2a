//! Forward-compatible enums.
//!
//! Servers add enum values faster than clients ship. [`ApiEnum`] decodes any
//! wire value without failing: values from the closed table become
//! [`ApiEnum::Known`], everything else is kept verbatim in
//! [`ApiEnum::Unknown`] and re-serializes byte-identically. Callers that want
//! strictness opt in through [`Validate`].

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::InvalidDataError;
use crate::raw::hash_value;
use crate::validate::Validate;

/// A closed set of wire strings, usually declared with [`wire_enum!`].
///
/// [`wire_enum!`]: crate::wire_enum
pub trait WireEnum: Copy + Eq + fmt::Debug + 'static {
    /// Type name used in error messages.
    const NAME: &'static str;
    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// Canonical wire string of this variant.
    fn as_wire(self) -> &'static str;

    /// Look a wire string up in the closed table.
    fn from_wire(value: &str) -> Option<Self>;
}

/// Declare a closed enum together with its wire table.
///
/// ```
/// meridian_core::wire_enum! {
///     /// Lifecycle of a charge.
///     pub enum ChargeStatus {
///         Pending => "pending",
///         Succeeded => "succeeded",
///     }
/// }
///
/// use meridian_core::WireEnum;
/// assert_eq!(ChargeStatus::from_wire("pending"), Some(ChargeStatus::Pending));
/// assert_eq!(ChargeStatus::Succeeded.as_wire(), "succeeded");
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                #[doc = concat!("`", $wire, "` on the wire.")]
                $(#[$vmeta])*
                $variant
            ),+
        }

        impl $crate::WireEnum for $name {
            const NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [Self] = &[ $( Self::$variant ),+ ];

            fn as_wire(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire ),+
                }
            }

            fn from_wire(value: &str) -> ::core::option::Option<Self> {
                match value {
                    $( $wire => ::core::option::Option::Some(Self::$variant), )+
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str($crate::WireEnum::as_wire(*self))
            }
        }
    };
}

/// An enum value as received from (or sent to) the wire.
#[derive(Clone)]
pub enum ApiEnum<E> {
    /// A member of the closed set.
    Known(E),
    /// Anything else, kept exactly as received.
    Unknown(Value),
}

impl<E: WireEnum> ApiEnum<E> {
    /// Decode a wire value. Never fails.
    pub fn from_wire(value: Value) -> Self {
        match value.as_str().and_then(E::from_wire) {
            Some(known) => Self::Known(known),
            None => Self::Unknown(value),
        }
    }

    /// The value that goes back on the wire.
    pub fn wire_value(&self) -> Value {
        match self {
            Self::Known(known) => Value::String(known.as_wire().to_string()),
            Self::Unknown(raw) => raw.clone(),
        }
    }

    /// The wire string, when the wire value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Known(known) => Some(known.as_wire()),
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    /// The closed-set member, if this value is one.
    pub fn known(&self) -> Option<E> {
        match self {
            Self::Known(known) => Some(*known),
            Self::Unknown(_) => None,
        }
    }

    /// Whether the wire value is in the closed set.
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// The closed-set member, or invalid data when the value is unknown.
    pub fn try_known(&self) -> Result<E, InvalidDataError> {
        match self {
            Self::Known(known) => Ok(*known),
            Self::Unknown(raw) => Err(InvalidDataError::UnknownVariant {
                field: None,
                enum_name: E::NAME,
                value: raw.clone(),
            }),
        }
    }
}

impl<E: WireEnum> From<E> for ApiEnum<E> {
    fn from(known: E) -> Self {
        Self::Known(known)
    }
}

impl<E: WireEnum> Validate for ApiEnum<E> {
    fn validate(&self) -> Result<(), InvalidDataError> {
        self.try_known().map(|_| ())
    }
}

impl<E: WireEnum> PartialEq for ApiEnum<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Known(left), Self::Known(right)) => left == right,
            _ => self.wire_value() == other.wire_value(),
        }
    }
}

impl<E: WireEnum> Eq for ApiEnum<E> {}

impl<E: WireEnum> PartialEq<E> for ApiEnum<E> {
    fn eq(&self, other: &E) -> bool {
        self.known() == Some(*other)
    }
}

impl<E: WireEnum> Hash for ApiEnum<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(&self.wire_value(), state);
    }
}

impl<E: WireEnum> fmt::Debug for ApiEnum<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(known) => f.debug_tuple("Known").field(known).finish(),
            Self::Unknown(raw) => f.debug_tuple("Unknown").field(raw).finish(),
        }
    }
}

impl<E: WireEnum> fmt::Display for ApiEnum<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(wire) => f.write_str(wire),
            None => write!(f, "{}", self.wire_value()),
        }
    }
}

impl<E: WireEnum> Serialize for ApiEnum<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(known) => serializer.serialize_str(known.as_wire()),
            Self::Unknown(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de, E: WireEnum> Deserialize<'de> for ApiEnum<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_wire)
    }
}
